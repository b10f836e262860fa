use std::f64::consts::{FRAC_PI_2, TAU};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::text::Line as TextLine;
use tui::widgets::canvas::{Canvas, Context, Line};
use tui::widgets::{Block, Widget};

/// Reference rings, in percentile points.
pub const RINGS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// Canvas half-extent; leaves room for axis labels outside the 100 ring.
const BOUND: f64 = 1.45;
const LABEL_RADIUS: f64 = 1.08;
const GRID_COLOR: Color = Color::DarkGray;

pub struct RadarSeries<'a> {
    pub scores: &'a [f64],
    pub color: Color,
}

/// Percentile polygon per player over one spoke per metric.
pub struct RadarChart<'a> {
    pub axes: Vec<&'static str>,
    pub series: Vec<RadarSeries<'a>>,
    pub block: Option<Block<'a>>,
}

/// Point on spoke `index` of `count` at `radius`. Spoke 0 points straight
/// up, the rest follow clockwise.
pub fn axis_point(index: usize, count: usize, radius: f64) -> (f64, f64) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let angle = FRAC_PI_2 - TAU * index as f64 / count as f64;
    (radius * angle.cos(), radius * angle.sin())
}

/// Closed outline of a score vector: percentiles map to radius 0..=1 and the
/// first vertex is repeated at the end.
pub fn radar_vertices(scores: &[f64]) -> Vec<(f64, f64)> {
    let n = scores.len();
    let mut vertices: Vec<(f64, f64)> = scores
        .iter()
        .enumerate()
        .map(|(i, s)| axis_point(i, n, (s / 100.0).clamp(0.0, 1.0)))
        .collect();
    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    vertices
}

fn draw_outline(ctx: &mut Context<'_>, vertices: &[(f64, f64)], color: Color) {
    for pair in vertices.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        ctx.draw(&Line { x1, y1, x2, y2, color });
    }
}

impl Widget for RadarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        if inner.width < 10 || inner.height < 5 {
            if let Some(block) = self.block {
                block.render(area, buf);
            }
            return;
        }

        let count = self.axes.len();
        // Canvas units per terminal column, for right-aligning labels on the left half.
        let unit_x = 2.0 * BOUND / f64::from(inner.width);
        let rings: Vec<Vec<(f64, f64)>> = RINGS
            .iter()
            .map(|r| radar_vertices(&vec![*r; count]))
            .collect();
        let outlines: Vec<(Vec<(f64, f64)>, Color)> = self
            .series
            .iter()
            .map(|s| (radar_vertices(s.scores), s.color))
            .collect();
        let axes = &self.axes;

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-BOUND, BOUND])
            .y_bounds([-BOUND, BOUND])
            .paint(move |ctx| {
                for ring in &rings {
                    draw_outline(ctx, ring, GRID_COLOR);
                }
                for i in 0..count {
                    let (x2, y2) = axis_point(i, count, 1.0);
                    ctx.draw(&Line { x1: 0.0, y1: 0.0, x2, y2, color: GRID_COLOR });
                }
                ctx.layer();

                for (outline, color) in &outlines {
                    draw_outline(ctx, outline, *color);
                }
                ctx.layer();

                for (i, label) in axes.iter().enumerate() {
                    let (mut x, y) = axis_point(i, count, LABEL_RADIUS);
                    if x < -0.05 {
                        x -= label.len() as f64 * unit_x;
                    } else if x.abs() <= 0.05 {
                        x -= label.len() as f64 * unit_x / 2.0;
                    }
                    ctx.print(
                        x,
                        y,
                        TextLine::styled(label.to_string(), Style::default().fg(Color::Gray)),
                    );
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}
