use std::path::Path;

use image::{Rgba, RgbaImage};
use palette::{Hsl, IntoColor, Pixel, Srgb};

use crate::error::Result;
use crate::models::{PositionedWordCloudEntry, Sentiment};
use crate::space::CANVAS_SIZE;
use crate::text::{scale_font_size, text_dimensions};

pub fn parse_background(value: &str) -> Result<Rgba<u8>> {
    let color = csscolorparser::parse(value)?;
    Ok(Rgba(color.to_rgba8()))
}

/// Green for positive, red for negative; more frequent entries are darker.
fn entry_color(entry: &PositionedWordCloudEntry, min: u32, max: u32) -> Rgba<u8> {
    let hue: f32 = match entry.entry.sentiment {
        Sentiment::Positive => 130.0,
        Sentiment::Negative => 0.0,
    };
    let weight = if max > min {
        ((entry.entry.count as f32 - min as f32) / (max - min) as f32).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let col: Hsl = Hsl::new(hue, 0.75, 0.7 - 0.3 * weight);
    let rgb: Srgb = col.into_color();

    let raw: [u8; 3] = rgb.into_format().into_raw();

    Rgba([raw[0], raw[1], raw[2], 255])
}

/// Draws each entry's estimated text box, lower stacking order first.
pub fn draw_layout(
    entries: &[PositionedWordCloudEntry],
    min: u32,
    max: u32,
    width: u32,
    height: u32,
    background: Rgba<u8>,
) -> RgbaImage {
    let mut buffer = RgbaImage::from_pixel(width, height, background);
    if width == 0 || height == 0 {
        return buffer;
    }

    let scale_x = width as f64 / CANVAS_SIZE;
    let scale_y = height as f64 / CANVAS_SIZE;

    let mut ordered: Vec<&PositionedWordCloudEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.z_index);

    for entry in ordered {
        let size = text_dimensions(
            &entry.entry.word,
            scale_font_size(entry.entry.count, min, max),
        );
        let center_x = entry.left / 100.0 * width as f64;
        let center_y = entry.top / 100.0 * height as f64;
        let half_w = size.width * scale_x / 2.0;
        let half_h = size.height * scale_y / 2.0;

        let x0 = (center_x - half_w).max(0.0) as u32;
        let y0 = (center_y - half_h).max(0.0) as u32;
        let x1 = ((center_x + half_w).ceil() as u32).min(width);
        let y1 = ((center_y + half_h).ceil() as u32).min(height);

        let color = entry_color(entry, min, max);
        for y in y0..y1 {
            for x in x0..x1 {
                buffer.put_pixel(x, y, color);
            }
        }
    }

    buffer
}

pub fn save_preview(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    image.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordCloudEntry;

    fn positioned(sentiment: Sentiment, left: f64, top: f64) -> PositionedWordCloudEntry {
        PositionedWordCloudEntry {
            entry: WordCloudEntry {
                word: "entrega".to_string(),
                count: 2,
                sentiment,
            },
            left,
            top,
            z_index: 1000,
            fallback: false,
        }
    }

    #[test]
    fn parse_css_colors() {
        assert_eq!(parse_background("#ff0000").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_background("white").unwrap(), Rgba([255, 255, 255, 255]));
        assert!(parse_background("not a color").is_err());
    }

    #[test]
    fn draws_boxes_over_background() {
        let background = Rgba([0, 0, 0, 255]);
        let image = draw_layout(
            &[positioned(Sentiment::Positive, 50.0, 50.0)],
            2,
            2,
            200,
            200,
            background,
        );

        let center = image.get_pixel(100, 100);
        assert_ne!(*center, background);
        assert!(center.0[1] > center.0[0]);
        assert_eq!(*image.get_pixel(0, 0), background);
    }

    #[test]
    fn negative_entries_are_red() {
        let image = draw_layout(
            &[positioned(Sentiment::Negative, 50.0, 50.0)],
            1,
            2,
            200,
            200,
            Rgba([0, 0, 0, 255]),
        );

        let center = image.get_pixel(100, 100);
        assert!(center.0[0] > center.0[1]);
    }
}
