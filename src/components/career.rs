use nba_stats_api::{CareerRecord, CareerSeason};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::text::Span;
use tui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CareerStat {
    Points,
    Assists,
    Rebounds,
}

impl CareerStat {
    pub const ALL: [CareerStat; 3] = [CareerStat::Points, CareerStat::Assists, CareerStat::Rebounds];

    pub fn title(&self) -> &'static str {
        match self {
            CareerStat::Points => "Points Per Game",
            CareerStat::Assists => "Assists Per Game",
            CareerStat::Rebounds => "Rebounds Per Game",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            CareerStat::Points => "PPG",
            CareerStat::Assists => "APG",
            CareerStat::Rebounds => "RPG",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CareerStat::Points => Color::Rgb(29, 66, 138),
            CareerStat::Assists => Color::Rgb(234, 179, 8),
            CareerStat::Rebounds => Color::Rgb(239, 68, 68),
        }
    }

    pub fn value(&self, season: &CareerSeason) -> f64 {
        match self {
            CareerStat::Points => season.ppg,
            CareerStat::Assists => season.apg,
            CareerStat::Rebounds => season.rpg,
        }
    }
}

/// `(row index, per-game value)` for every career row.
pub fn series(career: &CareerRecord, stat: CareerStat) -> Vec<(f64, f64)> {
    career
        .seasons
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, stat.value(s)))
        .collect()
}

/// Zero up to a tenth above the peak, and never a flat range.
pub fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let peak = points.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    if peak <= 0.0 { [0.0, 1.0] } else { [0.0, peak * 1.1] }
}

/// One per-game line over a player's seasons.
pub struct CareerChart<'a> {
    pub career: &'a CareerRecord,
    pub stat: CareerStat,
    pub block: Block<'a>,
}

impl Widget for CareerChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let points = series(self.career, self.stat);
        let [y_min, y_max] = y_bounds(&points);
        let x_max = points.len().saturating_sub(1).max(1) as f64;

        let first = self.career.seasons.first().map(|s| s.season_id.clone()).unwrap_or_default();
        let last = self.career.seasons.last().map(|s| s.season_id.clone()).unwrap_or_default();

        let dataset = Dataset::default()
            .name(self.stat.axis_label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.stat.color()))
            .data(&points);

        Chart::new(vec![dataset])
            .block(self.block)
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, x_max])
                    .labels([Span::raw(first), Span::raw(last)]),
            )
            .y_axis(
                Axis::default()
                    .title(self.stat.axis_label())
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([y_min, y_max])
                    .labels([
                        Span::raw(format!("{y_min:.0}")),
                        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                        Span::raw(format!("{y_max:.1}")),
                    ]),
            )
            .render(area, buf);
    }
}
