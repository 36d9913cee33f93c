use std::f64::consts::{PI, TAU};

use crate::text::TextSize;

pub const CANVAS_SIZE: f64 = 860.0;
pub const MIN_MARGIN: f64 = 40.0;
/// Required clearance between any two placed boxes.
pub const GAP: f64 = 14.0;
pub const STEP_RADIUS: f64 = 12.0;
pub const MAX_ATTEMPTS: u32 = 1200;
/// Vertical squash applied to spiral steps, the cloud is wider than tall.
const VERTICAL_SQUASH: f64 = 0.82;

pub fn golden_angle() -> f64 {
    PI * (3.0 - 5f64.sqrt())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis aligned box, positioned by its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered(center: Point, size: TextSize) -> Self {
        Rect {
            x: center.x,
            y: center.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True when the boxes are closer than `gap` on both axes.
    pub fn overlaps(&self, other: &Rect, gap: f64) -> bool {
        let horizontal = (self.width + other.width) / 2.0 + gap;
        let vertical = (self.height + other.height) / 2.0 + gap;

        (self.x - other.x).abs() < horizontal && (self.y - other.y).abs() < vertical
    }

    pub fn fits_within(&self, canvas: f64, margin: f64) -> bool {
        self.left() >= margin
            && self.right() <= canvas - margin
            && self.top() >= margin
            && self.bottom() <= canvas - margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

pub fn bounding_box(rects: &[Rect]) -> Option<Bounds> {
    let first = rects.first()?;
    let initial = Bounds {
        min_x: first.left(),
        max_x: first.right(),
        min_y: first.top(),
        max_y: first.bottom(),
    };

    Some(rects.iter().skip(1).fold(initial, |bounds, rect| Bounds {
        min_x: bounds.min_x.min(rect.left()),
        max_x: bounds.max_x.max(rect.right()),
        min_y: bounds.min_y.min(rect.top()),
        max_y: bounds.max_y.max(rect.bottom()),
    }))
}

pub fn region_is_empty(placed: &[Rect], candidate: &Rect, gap: f64) -> bool {
    !placed.iter().any(|rect| candidate.overlaps(rect, gap))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Found(Rect),
    /// Last spiral candidate, clamped into the margins; may overlap.
    Exhausted(Rect),
}

/// 在画布上沿黄金角螺旋寻找空位
///
/// The first candidate is the canvas center. Every failed attempt turns by the
/// golden angle, grows the radius and adds a jitter derived from
/// `seed + attempt`, so the walk is fully determined by its inputs.
pub fn find_space_for_rect(
    placed: &[Rect],
    size: TextSize,
    seed: u64,
    base_radius: f64,
    spread: f64,
) -> Placement {
    let center = CANVAS_SIZE / 2.0;
    let step_angle = golden_angle();

    let mut angle = seed as f64 % TAU;
    let mut radius = base_radius * spread;
    let mut position = Point {
        x: center,
        y: center,
    };

    let mut attempts: u32 = 0;
    while attempts < MAX_ATTEMPTS {
        let candidate = Rect::centered(position, size);
        if candidate.fits_within(CANVAS_SIZE, MIN_MARGIN) && region_is_empty(placed, &candidate, GAP)
        {
            return Placement::Found(candidate);
        }

        attempts += 1;
        angle += step_angle;
        radius += STEP_RADIUS * (0.55 + spread * 0.35);

        let jitter = ((seed + attempts as u64) % 60) as f64 / 60.0 - 0.5;
        let reach = radius + jitter * 14.0 * spread;
        position = Point {
            x: center + angle.cos() * reach,
            y: center + angle.sin() * reach * VERTICAL_SQUASH,
        };
    }

    let clamped = Point {
        x: position.x.clamp(MIN_MARGIN, CANVAS_SIZE - MIN_MARGIN),
        y: position.y.clamp(MIN_MARGIN, CANVAS_SIZE - MIN_MARGIN),
    };
    Placement::Exhausted(Rect::centered(clamped, size))
}
