use std::collections::BTreeSet;

use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table,
    Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::analytics::metrics::Metric;
use crate::analytics::trade::{MAX_SHARE_PCT, Severity, StatLine, TradeOutcome};
use crate::app::{App, MenuItem};
use crate::components::career::{CareerChart, CareerStat};
use crate::components::percentile_bars::{PercentileBars, PercentileRow};
use crate::components::radar::{RadarChart, RadarSeries};
use crate::state::app_state::{CompareSlot, TradePane};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use nba_stats_api::PlayerSeasonRecord;

static TABS: &[&str; 4] = &["Current Stats", "Career Trajectory", "Trade Simulator", "Compare"];

const PRIMARY_COLOR: Color = Color::Rgb(29, 66, 138);
const SECONDARY_COLOR: Color = Color::Rgb(224, 58, 62);
const PICKER_WIDTH: u16 = 28;

const TRADE_BLURB: &str = "How will this player's statline be impacted given a potential trade? \
This factors in the usage of the players being added and subtracted from the roster \
and gives you the ability to step in and tweak how this trade impacts the player's usage.";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::CurrentStats => draw_current_stats(f, layout.main, app),
            MenuItem::Career => draw_career(f, layout.main, app),
            MenuItem::Trade => draw_trade(f, layout.main, app),
            MenuItem::Compare => draw_compare(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::CurrentStats => 0,
        MenuItem::Career => 1,
        MenuItem::Trade => 2,
        MenuItem::Compare => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// `PHI | 39 GP | 33.6 MPG | Age: 29`
pub fn player_caption(player: &PlayerSeasonRecord) -> String {
    format!(
        "{} | {} GP | {:.1} MPG | Age: {}",
        player.team_abbreviation, player.games_played, player.minutes, player.age as u32
    )
}

fn season_caption(app: &App) -> String {
    let season = &app.state.season;
    format!(
        "Season {} | Min games {} | {} players",
        season.season(),
        season.min_games,
        season.view.len()
    )
}

/// Raw difference between two players on one metric, in display units.
pub fn format_diff(metric: Metric, diff: f64) -> String {
    if metric.is_percentage() && diff.abs() < 1.0 {
        format!("{:+.1}%", diff * 100.0)
    } else if metric.is_percentage() {
        format!("{diff:+.1}%")
    } else {
        format!("{diff:+.1}")
    }
}

/// Covers the loading and empty-season cases. Returns whether it drew anything.
fn draw_season_placeholder(f: &mut Frame, area: Rect, app: &App) -> bool {
    let season = &app.state.season;
    let mut lines = Vec::new();
    if season.is_loading() {
        lines.push(Line::from(format!("Loading {} player stats...", season.season())));
    } else if season.view.is_empty() {
        lines.push(Line::from(format!("No data for season {}", season.season())));
        if let Some(err) = app.state.last_error.as_deref() {
            lines.push(Line::from(""));
            lines.push(Line::styled(err.to_string(), Style::default().fg(Color::Red)));
        } else {
            lines.push(Line::styled(
                format!("No player reached {} games. Lower the filter with m/n.", season.min_games),
                Style::default().fg(Color::DarkGray),
            ));
        }
    } else {
        return false;
    }

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
    true
}

fn draw_player_picker(f: &mut Frame, area: Rect, app: &App, slot: CompareSlot, color: Color) {
    let view = &app.state.season.view;
    let title = if app.state.search.active {
        format!(" /{}_ ", app.state.search.query)
    } else {
        " Players ".to_string()
    };
    let items: Vec<ListItem> = view.names.iter().map(|n| ListItem::new(n.as_str())).collect();
    let selected = app
        .state
        .selection
        .get(slot)
        .and_then(|id| view.name_index(id));

    let list = List::new(items)
        .block(default_border(color).title(title))
        .highlight_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_player_header(f: &mut Frame, area: Rect, app: &App, player: &PlayerSeasonRecord) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                player.player_name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", season_caption(app)), Style::default().fg(Color::DarkGray)),
        ]),
        Line::styled(player_caption(player), Style::default().fg(Color::Gray)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn metric_labels(metrics: &[Metric]) -> Vec<&'static str> {
    metrics.iter().map(|m| m.label()).collect()
}

fn draw_current_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Current Stats ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_season_placeholder(f, inner, app) {
        return;
    }

    let [picker, body] =
        Layout::horizontal([Constraint::Length(PICKER_WIDTH), Constraint::Fill(1)]).areas(inner);
    draw_player_picker(f, picker, app, CompareSlot::Primary, Color::Gray);

    let Some(player) = app.state.primary_player() else {
        return;
    };
    let view = &app.state.season.view;
    let metrics = view.profile.metrics();
    let scores = view.percentiles(player.player_id).unwrap_or_default();

    let [header, charts] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(body);
    draw_player_header(f, header, app, player);

    let [radar_area, bars_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(charts);

    f.render_widget(
        RadarChart {
            axes: metric_labels(metrics),
            series: vec![RadarSeries { scores, color: PRIMARY_COLOR }],
            block: Some(default_border(Color::DarkGray).title(" Skill Radar ")),
        },
        radar_area,
    );

    let bars_block = default_border(Color::DarkGray).title(" Percentile Profile ");
    let bars_inner = bars_block.inner(bars_area);
    f.render_widget(bars_block, bars_area);

    let rows = metrics
        .iter()
        .map(|metric| PercentileRow {
            label: metric.label(),
            percentile: view.profile.score(player.player_id, *metric).unwrap_or_default(),
            value: metric.format_value(metric.value(player)),
        })
        .collect();
    f.render_widget(PercentileBars { rows }, bars_inner);
}

fn draw_career(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Career Trajectory ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_season_placeholder(f, inner, app) {
        return;
    }

    let [picker, body] =
        Layout::horizontal([Constraint::Length(PICKER_WIDTH), Constraint::Fill(1)]).areas(inner);
    draw_player_picker(f, picker, app, CompareSlot::Primary, Color::Gray);

    let Some(player) = app.state.primary_player() else {
        return;
    };

    let [header, content] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(body);
    draw_player_header(f, header, app, player);

    let career = &app.state.career;
    let record = match career.record.as_ref() {
        Some(record) if !record.is_empty() => record,
        Some(_) => {
            let mut lines = vec![Line::styled(
                "Career data unavailable.",
                Style::default().fg(Color::Yellow),
            )];
            if let Some(err) = career.error.as_deref() {
                lines.push(Line::styled(err.to_string(), Style::default().fg(Color::DarkGray)));
            }
            f.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
                content,
            );
            return;
        }
        None => {
            let message = if career.is_loading() {
                format!("Loading career for {}...", player.player_name)
            } else {
                "No career requested yet.".to_string()
            };
            f.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                content,
            );
            return;
        }
    };

    let [charts, caption] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(content);
    let areas: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(charts);
    for (stat, chart_area) in CareerStat::ALL.iter().zip(areas) {
        f.render_widget(
            CareerChart {
                career: record,
                stat: *stat,
                block: default_border(Color::DarkGray).title(format!(" {} ", stat.title())),
            },
            chart_area,
        );
    }

    if let Some(projection) = app.projection() {
        f.render_widget(
            Paragraph::new(projection.caption(player.age)).style(Style::default().fg(Color::Cyan)),
            caption,
        );
    }
}

fn trade_list<'a>(
    title: &'a str,
    players: &[&PlayerSeasonRecord],
    picked: &BTreeSet<u32>,
    focused: bool,
) -> List<'a> {
    let items: Vec<ListItem> = players
        .iter()
        .map(|p| {
            let mark = if picked.contains(&p.player_id) { "[x]" } else { "[ ]" };
            let style = if picked.contains(&p.player_id) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::styled(
                format!("{mark} {} ({:.1} FGA)", p.player_name, p.fga),
                style,
            ))
        })
        .collect();
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    List::new(items)
        .block(default_border(border).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
}

fn draw_trade(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Trade Simulator ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_season_placeholder(f, inner, app) {
        return;
    }
    let (Some(player), Some(candidates), Some(outcome)) = (
        app.state.primary_player(),
        app.state.trade_candidates(),
        app.trade_outcome(),
    ) else {
        return;
    };

    let [header, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    draw_player_header(f, header, app, player);

    let [controls, results] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
    let [outgoing_area, incoming_area, share_area, notes_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(controls);

    let trade = &app.state.trade;
    let scenario = &trade.scenario;
    for (pane, players, picked, list_area, title) in [
        (
            TradePane::Outgoing,
            &candidates.teammates,
            &scenario.outgoing,
            outgoing_area,
            " Remove teammates ",
        ),
        (
            TradePane::Incoming,
            &candidates.incoming,
            &scenario.incoming,
            incoming_area,
            " Add players ",
        ),
    ] {
        let focused = trade.pane == pane;
        let mut state = ListState::default();
        if focused && !players.is_empty() {
            state.select(Some(trade.cursor()));
        }
        f.render_stateful_widget(trade_list(title, players, picked, focused), list_area, &mut state);
    }

    let direction = outcome.direction();
    let gauge = Gauge::default()
        .block(default_border(Color::DarkGray).title(format!(" {} ", direction.slider_label())))
        .gauge_style(Style::default().fg(PRIMARY_COLOR).bg(Color::Black))
        .ratio(f64::from(scenario.share_pct) / f64::from(MAX_SHARE_PCT))
        .label(format!("{}% (h/l)", scenario.share_pct));
    f.render_widget(gauge, share_area);

    let mut notes = vec![Line::styled(
        direction.slider_help(outcome.net_vacated_fga, &outcome.subject),
        Style::default().fg(Color::Gray),
    )];
    if let Some(caption) = outcome.volume_caption() {
        notes.push(Line::styled(caption, Style::default().fg(Color::White)));
    } else if scenario.is_active() {
        notes.push(Line::styled(
            "Picked players are off both lists. Press c to clear.",
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(notes).wrap(Wrap { trim: true }), notes_area);

    draw_trade_results(f, results, &outcome);
}

fn draw_trade_results(f: &mut Frame, area: Rect, outcome: &TradeOutcome) {
    let messages = outcome.message_lines();
    let [message_area, cards_area, table_area, blurb_area] = Layout::vertical([
        Constraint::Length(messages.len() as u16 + 2),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(area);

    let severity_color = match outcome.severity() {
        Severity::Warning => Color::Yellow,
        Severity::Success => Color::Green,
    };
    let message_lines: Vec<Line> = messages
        .into_iter()
        .map(|m| Line::styled(m, Style::default().fg(severity_color)))
        .collect();
    f.render_widget(
        Paragraph::new(message_lines)
            .block(default_border(severity_color).title(" Projected Impact "))
            .wrap(Wrap { trim: true }),
        message_area,
    );

    let deltas = outcome.deltas();
    let cards: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(cards_area);
    for ((title, value, delta), card) in [
        ("Projected Points", outcome.projected.points, deltas.points),
        ("Projected Assists", outcome.projected.assists, deltas.assists),
        ("Projected Rebounds", outcome.projected.rebounds, deltas.rebounds),
    ]
    .into_iter()
    .zip(cards)
    {
        let delta_color = if delta < 0.0 { Color::Red } else { Color::Green };
        let lines = vec![
            Line::styled(format!("{value:.1}"), Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(format!("{delta:+.1}"), Style::default().fg(delta_color)),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(default_border(Color::DarkGray).title(format!(" {title} "))),
            card,
        );
    }

    f.render_widget(breakdown_table(outcome), table_area);

    f.render_widget(
        Paragraph::new(TRADE_BLURB)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true }),
        blurb_area,
    );
}

fn breakdown_table(outcome: &TradeOutcome) -> Table<'static> {
    let columns = [outcome.pre_trade, outcome.age_only, outcome.projected];
    let row = |label: &'static str, pick: fn(&StatLine) -> f64| {
        let mut cells = vec![Cell::from(label)];
        cells.extend(columns.iter().map(|line| Cell::from(format!("{:.1}", pick(line)))));
        Row::new(cells)
    };
    let rows = vec![
        row("Points", |l| l.points),
        row("Assists", |l| l.assists),
        row("Rebounds", |l| l.rebounds),
    ];
    let header = Row::new(["Stat", "Last Season", "Base Projection (Age Only)", "Trade Scenario"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(27),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(default_border(Color::DarkGray).title(" Stat Breakdown "))
}

fn draw_compare(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Compare ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_season_placeholder(f, inner, app) {
        return;
    }

    let slot = app.state.selection.slot;
    let picker_color = match slot {
        CompareSlot::Primary => PRIMARY_COLOR,
        CompareSlot::Secondary => SECONDARY_COLOR,
    };
    let [picker, body] =
        Layout::horizontal([Constraint::Length(PICKER_WIDTH), Constraint::Fill(1)]).areas(inner);
    draw_player_picker(f, picker, app, slot, picker_color);

    let (Some(first), Some(second)) = (app.state.primary_player(), app.state.secondary_player())
    else {
        return;
    };
    let view = &app.state.season.view;
    let metrics = view.profile.metrics();
    let first_scores = view.percentiles(first.player_id).unwrap_or_default();
    let second_scores = view.percentiles(second.player_id).unwrap_or_default();

    let [header, content] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(body);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    first.player_name.clone(),
                    Style::default().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" vs "),
                Span::styled(
                    second.player_name.clone(),
                    Style::default().fg(SECONDARY_COLOR).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::styled(
                format!("{}  (Tab switches the edited player)", season_caption(app)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        header,
    );

    let [radar_area, table_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(content);

    f.render_widget(
        RadarChart {
            axes: metric_labels(metrics),
            series: vec![
                RadarSeries { scores: first_scores, color: PRIMARY_COLOR },
                RadarSeries { scores: second_scores, color: SECONDARY_COLOR },
            ],
            block: Some(default_border(Color::DarkGray).title(" Skill Comparison ")),
        },
        radar_area,
    );

    let rows: Vec<Row> = metrics
        .iter()
        .map(|metric| {
            let a = metric.value(first);
            let b = metric.value(second);
            let diff_color = if a >= b { PRIMARY_COLOR } else { SECONDARY_COLOR };
            Row::new(vec![
                Cell::from(metric.label()),
                Cell::from(metric.format_value(a)),
                Cell::from(metric.format_value(b)),
                Cell::from(format_diff(*metric, a - b)).style(Style::default().fg(diff_color)),
            ])
        })
        .collect();
    let header_row = Row::new(vec![
        Cell::from("Stat"),
        Cell::from(first.player_name.as_str()).style(Style::default().fg(PRIMARY_COLOR)),
        Cell::from(second.player_name.as_str()).style(Style::default().fg(SECONDARY_COLOR)),
        Cell::from("Diff"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(8),
        ],
    )
    .header(header_row)
    .block(default_border(Color::DarkGray).title(" Head-to-Head "));
    f.render_widget(table, table_area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let keys: &[(&str, &str)] = &[
        ("1 2 3 4", "Current Stats, Career, Trade, Compare"),
        ("v", "toggle comparison mode"),
        ("s / S", "older / newer season"),
        ("m / M", "min games -1 / +1"),
        ("n / N", "min games -5 / +5"),
        ("j / k", "move down / up"),
        ("J / K", "jump 10 down / up"),
        ("/", "search player names (Enter or Esc to finish)"),
        ("Tab", "switch compared player, or trade list"),
        ("space", "add or remove the highlighted trade player"),
        ("h / l", "trade share -1% / +1%"),
        ("c", "clear the trade scenario"),
        ("f", "full screen"),
        ("\"", "show logs"),
        ("Esc", "leave help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>10}  "),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
