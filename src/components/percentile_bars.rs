use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

pub const ELITE: Color = Color::Rgb(34, 197, 94);
pub const AVERAGE: Color = Color::Rgb(234, 179, 8);
pub const POOR: Color = Color::Rgb(239, 68, 68);

const LABEL_WIDTH: u16 = 16;
/// Right-hand column holding the percentile number.
const SCORE_WIDTH: u16 = 5;
const FILL: &str = "█";
const TRACK: &str = "·";

pub struct PercentileRow {
    pub label: &'static str,
    pub percentile: f64,
    /// Raw value, already formatted for display.
    pub value: String,
}

/// One horizontal bar per metric, filled to the player's percentile.
pub struct PercentileBars {
    pub rows: Vec<PercentileRow>,
}

/// Green from the 80th percentile up, red at the 20th and below.
pub fn percentile_color(percentile: f64) -> Color {
    if percentile >= 80.0 {
        ELITE
    } else if percentile <= 20.0 {
        POOR
    } else {
        AVERAGE
    }
}

pub fn filled_cells(percentile: f64, width: u16) -> u16 {
    ((percentile / 100.0).clamp(0.0, 1.0) * f64::from(width)).round() as u16
}

impl Widget for PercentileBars {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width <= LABEL_WIDTH + SCORE_WIDTH || area.height == 0 {
            return;
        }
        let bar_width = area.width - LABEL_WIDTH - SCORE_WIDTH;
        // Spread rows out when there is room for a gap between them.
        let pitch = if area.height as usize >= self.rows.len() * 2 { 2 } else { 1 };

        for (i, row) in self.rows.iter().enumerate() {
            let y = area.y + (i * pitch) as u16;
            if y >= area.bottom() {
                break;
            }
            let color = percentile_color(row.percentile);
            let label: String = row.label.chars().take(LABEL_WIDTH as usize - 1).collect();
            buf.set_string(area.x, y, label, Style::default().fg(Color::Gray));

            let bar_x = area.x + LABEL_WIDTH;
            let filled = filled_cells(row.percentile, bar_width);
            for dx in 0..bar_width {
                let (symbol, style) = if dx < filled {
                    (FILL, Style::default().fg(color))
                } else {
                    (TRACK, Style::default().fg(Color::DarkGray))
                };
                buf.set_string(bar_x + dx, y, symbol, style);
            }

            // Raw value sits at the end of the filled part, or just past it
            // when the bar is too short.
            let text_len = row.value.chars().count() as u16;
            let text_x = if filled > text_len {
                bar_x + filled - text_len
            } else {
                bar_x + filled.min(bar_width.saturating_sub(text_len))
            };
            let text_style = if filled > text_len {
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            buf.set_stringn(text_x, y, &row.value, bar_width as usize, text_style);

            let score = format!("{:>4.0}", row.percentile);
            buf.set_string(bar_x + bar_width + 1, y, score, Style::default().fg(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &'static str, percentile: f64, value: &str) -> PercentileRow {
        PercentileRow { label, percentile, value: value.to_string() }
    }

    #[test]
    fn colour_thresholds() {
        assert_eq!(percentile_color(80.0), ELITE);
        assert_eq!(percentile_color(99.0), ELITE);
        assert_eq!(percentile_color(79.9), AVERAGE);
        assert_eq!(percentile_color(20.1), AVERAGE);
        assert_eq!(percentile_color(20.0), POOR);
        assert_eq!(percentile_color(0.0), POOR);
    }

    #[test]
    fn fill_is_proportional_and_clamped() {
        assert_eq!(filled_cells(50.0, 20), 10);
        assert_eq!(filled_cells(100.0, 20), 20);
        assert_eq!(filled_cells(0.0, 20), 0);
        assert_eq!(filled_cells(130.0, 20), 20);
    }

    #[test]
    fn renders_label_bar_and_score() {
        // 16 label + 20 bar + 5 score.
        let area = Rect::new(0, 0, 41, 1);
        let mut buf = Buffer::empty(area);
        PercentileBars { rows: vec![row("Minutes", 50.0, "33.6")] }.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "M");
        assert_eq!(buf[(16, 0)].symbol(), FILL);
        assert_eq!(buf[(16, 0)].fg, AVERAGE);
        assert_eq!(buf[(35, 0)].symbol(), TRACK);
        // "33.6" is right-aligned inside the ten filled cells.
        assert_eq!(buf[(22, 0)].symbol(), "3");
        assert_eq!(buf[(25, 0)].symbol(), "6");
        assert_eq!(buf[(39, 0)].symbol(), "5");
        assert_eq!(buf[(40, 0)].symbol(), "0");
    }

    #[test]
    fn rows_beyond_the_area_are_skipped() {
        let area = Rect::new(0, 0, 41, 2);
        let mut buf = Buffer::empty(area);
        let rows = (0..5).map(|i| row("Metric", f64::from(i) * 20.0, "1.0")).collect();
        PercentileBars { rows }.render(area, &mut buf);
        assert_eq!(buf[(0, 1)].symbol(), "M");
    }

    #[test]
    fn narrow_area_renders_nothing() {
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        PercentileBars { rows: vec![row("Minutes", 90.0, "36.0")] }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
