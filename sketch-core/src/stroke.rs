// Path stroking for the software raster.
// A stroke is rasterized into a coverage mask first, then composited once per covered pixel.

use crate::color::{destination_out, source_over, with_opacity};
use crate::shape::Shape;
use egui::{Color32, Pos2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SourceOver,
    /// Erase: the stroke's alpha is removed from what is underneath.
    DestinationOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub color: Color32,
    /// Global alpha in [0, 1].
    pub opacity: f32,
    pub composite: Composite,
}

impl StrokeStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            color,
            opacity: 1.0,
            composite: Composite::SourceOver,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn erasing(mut self) -> Self {
        self.composite = Composite::DestinationOut;
        self
    }

    /// The premultiplied color actually laid down.
    pub fn paint(&self) -> Color32 {
        with_opacity(self.color, self.opacity)
    }
}

/// Which pixels a stroke touches, over the whole canvas.
pub(crate) struct Coverage {
    width: u32,
    height: u32,
    mask: Vec<bool>,
}

impl Coverage {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mask: vec![false; width as usize * height as usize],
        }
    }

    /// Mark pixels whose centers satisfy `inside`, within a clipped bounding box.
    fn mark(&mut self, min: Pos2, max: Pos2, inside: impl Fn(Pos2) -> bool) {
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(center) {
                    self.mask[y as usize * self.width as usize + x as usize] = true;
                }
            }
        }
    }

    fn mark_segment(&mut self, a: Pos2, b: Pos2, half: f32, cap: LineCap) {
        let pad = Vec2::splat(half + 1.0);
        let min = a.min(b) - pad;
        let max = a.max(b) + pad;
        let d = b - a;
        let len_sq = d.length_sq();

        if len_sq == 0.0 {
            match cap {
                LineCap::Butt => {}
                LineCap::Round => self.mark(min, max, |c| c.distance(a) <= half),
                LineCap::Square => self.mark(min, max, |c| {
                    (c.x - a.x).abs() <= half && (c.y - a.y).abs() <= half
                }),
            }
            return;
        }

        let len = len_sq.sqrt();
        let ext = match cap {
            LineCap::Square => half / len,
            _ => 0.0,
        };
        self.mark(min, max, |c| {
            let t = (c - a).dot(d) / len_sq;
            match cap {
                LineCap::Round => {
                    let nearest = a + d * t.clamp(0.0, 1.0);
                    c.distance(nearest) <= half
                }
                LineCap::Butt | LineCap::Square => {
                    let perpendicular = (d.x * (c.y - a.y) - d.y * (c.x - a.x)).abs() / len;
                    (-ext..=1.0 + ext).contains(&t) && perpendicular <= half
                }
            }
        });
    }

    fn mark_ring(&mut self, center: Pos2, radius: f32, half: f32) {
        let pad = Vec2::splat(radius + half + 1.0);
        self.mark(center - pad, center + pad, |c| {
            (c.distance(center) - radius).abs() <= half
        });
    }
}

pub(crate) fn coverage(shape: &Shape, style: &StrokeStyle, width: u32, height: u32) -> Coverage {
    let mut coverage = Coverage::new(width, height);
    if !(style.width > 0.0) {
        return coverage;
    }
    let half = style.width / 2.0;

    match shape {
        Shape::Line { from, to } => coverage.mark_segment(*from, *to, half, style.cap),
        Shape::Rectangle { corner_a, corner_b } => {
            let a = *corner_a;
            let b = Pos2::new(corner_b.x, corner_a.y);
            let c = *corner_b;
            let d = Pos2::new(corner_a.x, corner_b.y);
            // Square ends close the corners the way a mitered rectangle would.
            for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
                coverage.mark_segment(from, to, half, LineCap::Square);
            }
        }
        Shape::Circle { center, radius } => coverage.mark_ring(*center, *radius, half),
        Shape::Freehand { points } => match points.as_slice() {
            [] => {}
            [only] => coverage.mark_segment(*only, *only, half, LineCap::Round),
            _ => {
                for pair in points.windows(2) {
                    coverage.mark_segment(pair[0], pair[1], half, LineCap::Round);
                }
            }
        },
    }

    coverage
}

/// Composite `style` into every covered pixel. Returns how many pixels were touched.
pub(crate) fn apply(pixels: &mut [Color32], coverage: &Coverage, style: &StrokeStyle) -> usize {
    let paint = style.paint();
    let mut touched = 0;
    for (pixel, covered) in pixels.iter_mut().zip(coverage.mask.iter()) {
        if !covered {
            continue;
        }
        *pixel = match style.composite {
            Composite::SourceOver => source_over(*pixel, paint),
            Composite::DestinationOut => destination_out(*pixel, paint),
        };
        touched += 1;
    }
    touched
}
