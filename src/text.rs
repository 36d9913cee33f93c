pub const MIN_FONT_SIZE: f64 = 1.0;
pub const MAX_FONT_SIZE: f64 = 2.4;
/// Size used when every rendered entry shares the same count.
pub const FLAT_FONT_SIZE: f64 = 1.55;
/// Pixels per font size unit.
pub const PX_PER_UNIT: f64 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Linear map of `count` from `[min, max]` onto the font size scale, rounded to 2 decimals.
pub fn scale_font_size(count: u32, min: u32, max: u32) -> f64 {
    if min == max {
        return FLAT_FONT_SIZE;
    }

    let normalized = (count as f64 - min as f64) / (max as f64 - min as f64);
    let size = MIN_FONT_SIZE + normalized * (MAX_FONT_SIZE - MIN_FONT_SIZE);
    (size * 100.0).round() / 100.0
}

//估算文字占用的矩形，不依赖字体文件
pub fn text_dimensions(text: &str, font_size: f64) -> TextSize {
    let font_size_px = font_size * PX_PER_UNIT;
    let chars = text.chars().count() as f64;

    TextSize {
        width: (font_size_px * 2.8).max(font_size_px * chars * 0.55 + 12.0),
        height: font_size_px * 1.6,
    }
}

/// Sum of the word's character codes; keeps placement reproducible per word.
pub fn char_code_seed(text: &str) -> u64 {
    text.chars().map(|c| c as u64).sum()
}
