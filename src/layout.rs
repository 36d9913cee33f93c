use std::cmp::Reverse;

use tracing::{debug, trace};

use crate::models::{PositionedWordCloudEntry, WordCloudEntry};
use crate::space::{
    bounding_box, find_space_for_rect, Bounds, Placement, Rect, CANVAS_SIZE, MIN_MARGIN,
    STEP_RADIUS,
};
use crate::text::{char_code_seed, scale_font_size, text_dimensions};

const MIN_RESCALE: f64 = 0.75;
const MAX_RESCALE: f64 = 1.35;
/// Rescale factors this close to 1 are skipped.
const RESCALE_DEADBAND: f64 = 0.06;
/// Smallest cloud extent used when computing the rescale factor.
const MIN_CLOUD_EXTENT: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlacedEntry {
    pub entry: WordCloudEntry,
    pub rect: Rect,
    pub rank: usize,
    pub fallback: bool,
}

/// Starting spiral radius for the entry at `rank`; the top entry starts at the center.
fn base_radius(rank: usize, font_size: f64) -> f64 {
    if rank == 0 {
        return 0.0;
    }

    let growth = STEP_RADIUS * ((rank + 2) as f64).sqrt() * (font_size * 0.9).max(0.85);
    (50.0 + growth).max(80.0)
}

pub(crate) fn z_index(rank: usize, fallback: bool) -> i32 {
    let ceiling: i64 = if fallback { 500 } else { 1000 };
    (ceiling - rank as i64 * 5).max(1) as i32
}

fn to_percent(value: f64, min: f64, max: f64) -> f64 {
    (value / CANVAS_SIZE * 100.0).clamp(min, max)
}

/// Uniform scale that fits `bounds` into the canvas minus margins, if it is worth applying.
pub(crate) fn rescale_factor(bounds: &Bounds) -> Option<f64> {
    let target = CANVAS_SIZE - MIN_MARGIN * 2.0;
    let cloud_width = bounds.width().max(MIN_CLOUD_EXTENT);
    let cloud_height = bounds.height().max(MIN_CLOUD_EXTENT);

    let scale = (target / cloud_width)
        .min(target / cloud_height)
        .clamp(MIN_RESCALE, MAX_RESCALE);

    if (scale - 1.0).abs() > RESCALE_DEADBAND {
        Some(scale)
    } else {
        None
    }
}

pub(crate) fn place_entries(
    entries: &[WordCloudEntry],
    min_count: u32,
    max_count: u32,
    spread: f64,
) -> Vec<PlacedEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| Reverse(entry.count));

    let mut rects: Vec<Rect> = Vec::with_capacity(sorted.len());
    let mut placed = Vec::with_capacity(sorted.len());

    for (rank, entry) in sorted.into_iter().enumerate() {
        let font_size = scale_font_size(entry.count, min_count, max_count);
        let size = text_dimensions(&entry.word, font_size);
        let seed = char_code_seed(&entry.word);

        let (rect, fallback) = match find_space_for_rect(
            &rects,
            size,
            seed,
            base_radius(rank, font_size),
            spread,
        ) {
            Placement::Found(rect) => {
                trace!("placed {:?} at ({:.1}, {:.1})", entry.word, rect.x, rect.y);
                (rect, false)
            }
            Placement::Exhausted(rect) => {
                debug!(
                    "no free space for {:?} (rank {}), falling back to ({:.1}, {:.1})",
                    entry.word, rank, rect.x, rect.y
                );
                (rect, true)
            }
        };

        rects.push(rect);
        placed.push(PlacedEntry {
            entry,
            rect,
            rank,
            fallback,
        });
    }

    placed
}

/// Positions every entry on the canvas, largest counts first.
///
/// Coordinates are percentages of the canvas. After placement the whole cloud
/// is recentered and scaled when its bounding box is noticeably smaller or
/// larger than the usable canvas.
pub fn layout_word_cloud(
    entries: &[WordCloudEntry],
    min_count: u32,
    max_count: u32,
    spread: f64,
) -> Vec<PositionedWordCloudEntry> {
    if entries.is_empty() {
        return vec![];
    }

    let placed = place_entries(entries, min_count, max_count, spread);
    let rects: Vec<Rect> = placed.iter().map(|placed| placed.rect).collect();

    let rescale = bounding_box(&rects)
        .and_then(|bounds| rescale_factor(&bounds).map(|scale| (bounds.center(), scale)));

    debug!(
        "laid out {} entries, {} fallback, rescale {:?}",
        placed.len(),
        placed.iter().filter(|placed| placed.fallback).count(),
        rescale.map(|(_, scale)| scale)
    );

    placed
        .into_iter()
        .map(|placed| {
            let z_index = z_index(placed.rank, placed.fallback);
            let (left, top) = match rescale {
                Some((center, scale)) => {
                    let x = CANVAS_SIZE / 2.0 + (placed.rect.x - center.x) * scale;
                    let y = CANVAS_SIZE / 2.0 + (placed.rect.y - center.y) * scale;
                    (to_percent(x, 8.0, 92.0), to_percent(y, 10.0, 90.0))
                }
                None => (
                    to_percent(placed.rect.x, 10.0, 90.0),
                    to_percent(placed.rect.y, 12.0, 88.0),
                ),
            };

            PositionedWordCloudEntry {
                entry: placed.entry,
                left,
                top,
                z_index,
                fallback: placed.fallback,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::space::{region_is_empty, GAP};

    const WORDS: &[&str] = &[
        "atendimento", "entrega", "produto", "qualidade", "preço", "demora", "suporte",
        "obrigado amigo", "excelente", "péssimo", "rápido", "embalagem", "loja", "aplicativo",
        "pagamento", "reembolso", "vendedor", "frete", "garantia", "cupom", "site lento",
        "troca", "defeito", "cor bonita", "tamanho certo", "recomendo", "nunca mais",
        "caixa amassada", "chegou antes", "ótimo preço", "fila enorme", "bom", "ruim",
        "cliente", "parabéns", "equipe", "mensagem", "resposta", "prazo", "nota fiscal",
    ];

    fn entries() -> Vec<WordCloudEntry> {
        WORDS
            .iter()
            .enumerate()
            .map(|(index, word)| WordCloudEntry {
                word: word.to_string(),
                count: (WORDS.len() - index) as u32 / 3 + 1,
                sentiment: if index % 2 == 0 {
                    Sentiment::Negative
                } else {
                    Sentiment::Positive
                },
            })
            .collect()
    }

    fn entry(word: &str, count: u32) -> WordCloudEntry {
        WordCloudEntry {
            word: word.to_string(),
            count,
            sentiment: Sentiment::Positive,
        }
    }

    #[test]
    fn empty_input() {
        assert!(layout_word_cloud(&[], 0, 0, 1.0).is_empty());
    }

    #[test]
    fn single_entry_sits_at_center() {
        let positioned = layout_word_cloud(&[entry("obrigado", 3)], 3, 3, 1.0);

        assert_eq!(positioned.len(), 1);
        assert!((positioned[0].left - 50.0).abs() < 1e-9);
        assert!((positioned[0].top - 50.0).abs() < 1e-9);
        assert_eq!(positioned[0].z_index, 1000);
        assert!(!positioned[0].fallback);
    }

    #[test]
    fn output_matches_input_length_and_count_order() {
        let input = vec![entry("pouco", 1), entry("muito frete", 9), entry("meio", 4)];
        let positioned = layout_word_cloud(&input, 1, 9, 1.0);

        let words: Vec<&str> = positioned
            .iter()
            .map(|positioned| positioned.entry.word.as_str())
            .collect();
        assert_eq!(words, vec!["muito frete", "meio", "pouco"]);
        assert_eq!(
            positioned.iter().map(|p| p.z_index).collect::<Vec<_>>(),
            vec![1000, 995, 990]
        );
    }

    #[test]
    fn placed_boxes_keep_their_gap() {
        let input = entries();
        let placed = place_entries(&input, 1, 14, 1.0);
        assert_eq!(placed.len(), input.len());

        let clean: Vec<&PlacedEntry> = placed.iter().filter(|placed| !placed.fallback).collect();
        for (index, placed) in clean.iter().enumerate() {
            let others: Vec<Rect> = clean[..index].iter().map(|other| other.rect).collect();
            assert!(region_is_empty(&others, &placed.rect, GAP), "{}", placed.entry.word);
            assert!(placed.rect.fits_within(CANVAS_SIZE, MIN_MARGIN));
        }
    }

    #[test]
    fn coordinates_stay_in_clamp_ranges() {
        let input = entries();
        for spread in [0.5, 0.75, 1.0, 1.5, 2.0] {
            let positioned = layout_word_cloud(&input, 1, 14, spread);
            assert_eq!(positioned.len(), input.len());
            for entry in &positioned {
                assert!((8.0..=92.0).contains(&entry.left), "left {}", entry.left);
                assert!((10.0..=90.0).contains(&entry.top), "top {}", entry.top);
                assert!(entry.z_index >= 1);
            }
        }
    }

    #[test]
    fn layout_is_reproducible() {
        let input = entries();
        assert_eq!(
            layout_word_cloud(&input, 1, 14, 1.2),
            layout_word_cloud(&input, 1, 14, 1.2)
        );
    }

    #[test]
    fn stacking_order() {
        assert_eq!(z_index(0, false), 1000);
        assert_eq!(z_index(10, false), 950);
        assert_eq!(z_index(0, true), 500);
        assert_eq!(z_index(10, true), 450);
        assert_eq!(z_index(150, true), 1);
        assert_eq!(z_index(400, false), 1);
    }

    #[test]
    fn base_radius_grows_with_rank() {
        assert_eq!(base_radius(0, 2.4), 0.0);
        assert_eq!(base_radius(1, 1.0), 80.0);
        let far = base_radius(30, 2.4);
        assert!((far - (50.0 + 12.0 * 32f64.sqrt() * 2.16)).abs() < 1e-9);
    }

    #[test]
    fn rescale_deadband_and_limits() {
        let fitted = Bounds {
            min_x: 40.0,
            max_x: 820.0,
            min_y: 300.0,
            max_y: 500.0,
        };
        assert_eq!(rescale_factor(&fitted), None);

        let tiny = Bounds {
            min_x: 400.0,
            max_x: 460.0,
            min_y: 420.0,
            max_y: 440.0,
        };
        assert_eq!(rescale_factor(&tiny), Some(MAX_RESCALE));

        let huge = Bounds {
            min_x: -400.0,
            max_x: 1200.0,
            min_y: 0.0,
            max_y: 860.0,
        };
        assert_eq!(rescale_factor(&huge), Some(MIN_RESCALE));

        let slightly_small = Bounds {
            min_x: 60.0,
            max_x: 800.0,
            min_y: 400.0,
            max_y: 460.0,
        };
        assert_eq!(rescale_factor(&slightly_small), None);
    }
}
