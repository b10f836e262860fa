use crate::analytics::projection::{ProjectionResult, project};
use crate::analytics::trade::{self, TradeOutcome};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, CompareSlot};
use crate::state::messages::NetworkRequest;
use chrono::{Datelike, Local};
use log::{debug, warn};
use nba_stats_api::{CareerRecord, SeasonTable};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    CurrentStats,
    Career,
    Trade,
    Compare,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let app = Self::with_settings(settings, Local::now().year());

        let level = app.settings.effective_log_level();
        log::set_max_level(level);
        tui_logger::set_default_level(level);

        app
    }

    pub fn with_settings(settings: AppSettings, current_year: i32) -> Self {
        Self {
            state: AppState::new(&settings, current_year),
            settings,
        }
    }

    pub fn season_request(&self) -> NetworkRequest {
        NetworkRequest::LoadSeason {
            season: self.state.season.season().to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_season_loaded(&mut self, table: SeasonTable) {
        if table.season != self.state.season.season() {
            debug!("ignoring stale season {}", table.season);
            return;
        }
        self.state.last_error = None;
        self.state.season.load(table);
        self.reconcile_selection();
    }

    pub fn on_season_failed(&mut self, season: String, message: String) {
        if season != self.state.season.season() {
            debug!("ignoring stale failure for season {season}");
            return;
        }
        self.state.last_error = Some(format!("Could not load {season}: {message}"));
        self.state.season.load(SeasonTable::empty(season));
        self.reconcile_selection();
    }

    pub fn on_career_loaded(&mut self, career: CareerRecord) {
        let player_id = career.player_id;
        if !self.state.career.accept(career) {
            debug!("ignoring stale career for player {player_id}");
        }
    }

    pub fn on_career_failed(&mut self, player_id: u32, message: String) {
        if self.state.career.fail(player_id, message) {
            warn!("career for player {player_id} unavailable");
        }
    }

    /// A career fetch for the primary player, when the career tab needs one.
    pub fn career_request(&mut self) -> Option<NetworkRequest> {
        if self.state.active_tab != MenuItem::Career {
            return None;
        }
        let player_id = self.state.primary_player()?.player_id;
        if self.state.career.is_current(player_id) {
            return None;
        }
        self.state.career.request(player_id);
        Some(NetworkRequest::LoadCareer { player_id })
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.search.finish();
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    /// Flip between the single-player view and comparison mode.
    pub fn toggle_compare(&mut self) {
        let next = if self.state.active_tab == MenuItem::Compare {
            MenuItem::CurrentStats
        } else {
            MenuItem::Compare
        };
        self.update_tab(next);
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Season + filter
    // -----------------------------------------------------------------------

    pub fn season_older(&mut self) -> Option<NetworkRequest> {
        if !self.state.season.older() {
            return None;
        }
        self.on_season_changed();
        Some(self.season_request())
    }

    pub fn season_newer(&mut self) -> Option<NetworkRequest> {
        if !self.state.season.newer() {
            return None;
        }
        self.on_season_changed();
        Some(self.season_request())
    }

    pub fn adjust_min_games(&mut self, delta: i16) {
        if self.state.season.adjust_min_games(delta) {
            self.reconcile_selection();
        }
    }

    fn on_season_changed(&mut self) {
        self.state.last_error = None;
        self.state.search.finish();
        self.state.trade.reset();
    }

    fn reconcile_selection(&mut self) {
        let changed = self
            .state
            .selection
            .reconcile(&self.state.season.view, self.settings.default_player.as_deref());
        if changed {
            self.state.trade.reset();
        }
    }

    // -----------------------------------------------------------------------
    // Navigation — the player picker, or the focused trade list
    // -----------------------------------------------------------------------

    pub fn move_selection(&mut self, delta: isize) {
        if self.state.active_tab == MenuItem::Trade {
            let len = self.trade_pane_len();
            self.state.trade.step(delta, len);
            return;
        }

        let slot = self.state.selection.active_slot(self.state.active_tab);
        let before = self.state.selection.primary;
        self.state
            .selection
            .step(&self.state.season.view, slot, delta);
        if slot == CompareSlot::Primary && before != self.state.selection.primary {
            self.state.trade.reset();
        }
    }

    pub fn switch_focus(&mut self) {
        match self.state.active_tab {
            MenuItem::Trade => self.state.trade.switch_pane(),
            MenuItem::Compare => self.state.selection.switch_slot(),
            _ => {}
        }
    }

    pub fn search_start(&mut self) {
        if matches!(self.state.active_tab, MenuItem::Help) {
            return;
        }
        self.state.search.start();
    }

    pub fn search_push(&mut self, c: char) {
        self.state.search.query.push(c);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.state.search.query.pop();
        self.apply_search();
    }

    pub fn search_finish(&mut self) {
        self.state.search.finish();
    }

    /// Jump to the first name containing the query, in whichever list the
    /// current tab navigates.
    fn apply_search(&mut self) {
        let query = self.state.search.query.trim().to_lowercase();
        if query.is_empty() {
            return;
        }

        if self.state.active_tab == MenuItem::Trade {
            let found = self
                .state
                .season
                .trade_candidates(self.state.selection.primary)
                .and_then(|candidates| {
                    self.state
                        .trade
                        .pane_players(&candidates)
                        .iter()
                        .position(|p| p.player_name.to_lowercase().contains(&query))
                });
            if let Some(index) = found {
                self.state.trade.set_cursor(index);
            }
            return;
        }

        let Some(index) = self.state.season.view.search(&query) else {
            return;
        };
        let Some(player_id) = self.state.season.view.player_at(index).map(|p| p.player_id) else {
            return;
        };
        let slot = self.state.selection.active_slot(self.state.active_tab);
        if slot == CompareSlot::Primary && self.state.selection.primary != Some(player_id) {
            self.state.trade.reset();
        }
        self.state.selection.set(slot, player_id);
    }

    // -----------------------------------------------------------------------
    // Trade simulator
    // -----------------------------------------------------------------------

    pub fn trade_toggle(&mut self) {
        if let Some(candidates) = self
            .state
            .season
            .trade_candidates(self.state.selection.primary)
        {
            self.state.trade.toggle_at_cursor(&candidates);
        }
    }

    pub fn trade_share_up(&mut self) {
        self.state.trade.scenario.increase_share();
    }

    pub fn trade_share_down(&mut self) {
        self.state.trade.scenario.decrease_share();
    }

    pub fn trade_clear(&mut self) {
        self.state.trade.reset();
    }

    fn trade_pane_len(&self) -> usize {
        self.state
            .trade_candidates()
            .map(|c| self.state.trade.pane_players(&c).len())
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Derived views — recomputed on every draw
    // -----------------------------------------------------------------------

    pub fn projection(&self) -> Option<ProjectionResult> {
        self.state.primary_player().map(|p| project(p, None))
    }

    pub fn trade_outcome(&self) -> Option<TradeOutcome> {
        let subject = self.state.primary_player()?;
        let candidates = self.state.trade_candidates()?;
        let base = project(subject, None);
        Some(trade::evaluate(
            &candidates,
            subject,
            &self.state.trade.scenario,
            &base,
            &self.settings.trade_model,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nba_stats_api::PlayerSeasonRecord;

    fn player(id: u32, name: &str, team: u32, games: u32, fga: f64) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_id: id,
            player_name: name.to_string(),
            team_id: team,
            games_played: games,
            age: 27.0,
            points: 20.0,
            assists: 4.0,
            rebounds: 6.0,
            fga,
            ..Default::default()
        }
    }

    fn table(season: &str) -> SeasonTable {
        SeasonTable {
            season: season.to_string(),
            players: vec![
                player(1, "Joel Embiid", 10, 39, 21.8),
                player(2, "Tyrese Maxey", 10, 70, 15.0),
                player(3, "Jayson Tatum", 20, 74, 5.0),
                player(4, "Nikola Jokic", 30, 79, 18.0),
            ],
        }
    }

    fn app() -> App {
        let mut app = App::with_settings(AppSettings::default(), 2025);
        app.on_season_loaded(table("2023-24"));
        app
    }

    #[test]
    fn loads_default_player() {
        let app = app();
        assert_eq!(
            app.state.primary_player().map(|p| p.player_name.as_str()),
            Some("Joel Embiid")
        );
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn stale_season_is_ignored() {
        let mut app = App::with_settings(AppSettings::default(), 2025);
        app.on_season_loaded(table("2019-20"));
        assert!(app.state.season.is_loading());

        app.on_season_failed("2019-20".into(), "timeout".into());
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn failed_season_renders_empty_with_error() {
        let mut app = App::with_settings(AppSettings::default(), 2025);
        app.on_season_failed("2023-24".into(), "HTTP 500".into());

        assert!(!app.state.season.is_loading());
        assert!(app.state.season.view.is_empty());
        assert!(app.state.primary_player().is_none());
        assert!(app.projection().is_none());
        assert!(app.trade_outcome().is_none());
        assert_eq!(
            app.state.last_error.as_deref(),
            Some("Could not load 2023-24: HTTP 500")
        );
    }

    #[test]
    fn season_change_requests_table_and_clears_trade() {
        let mut app = app();
        app.update_tab(MenuItem::Trade);
        app.trade_toggle();
        assert!(app.state.trade.scenario.is_active());

        let request = app.season_older();
        assert_eq!(
            request,
            Some(NetworkRequest::LoadSeason { season: "2022-23".into() })
        );
        assert!(!app.state.trade.scenario.is_active());
        assert!(app.state.season.is_loading());
    }

    #[test]
    fn career_requested_once_per_player_on_career_tab() {
        let mut app = app();
        assert_eq!(app.career_request(), None);

        app.update_tab(MenuItem::Career);
        assert_eq!(app.career_request(), Some(NetworkRequest::LoadCareer { player_id: 1 }));
        assert_eq!(app.career_request(), None);

        app.move_selection(1);
        let next = app.state.selection.primary.unwrap();
        assert_ne!(next, 1);
        assert_eq!(
            app.career_request(),
            Some(NetworkRequest::LoadCareer { player_id: next })
        );

        app.on_career_loaded(CareerRecord::empty(1));
        assert!(app.state.career.record.is_none(), "stale career dropped");
    }

    #[test]
    fn changing_subject_clears_scenario() {
        let mut app = app();
        app.update_tab(MenuItem::Trade);
        app.trade_toggle();
        assert!(app.state.trade.scenario.is_active());

        app.update_tab(MenuItem::CurrentStats);
        app.move_selection(1);
        assert!(!app.state.trade.scenario.is_active());
    }

    #[test]
    fn trade_outcome_reflects_scenario() {
        let mut app = app();
        app.update_tab(MenuItem::Trade);
        // Maxey (15.0 FGA) out, Tatum (5.0 FGA) in, 20% share.
        app.trade_toggle();
        app.switch_focus();
        app.search_start();
        for c in "tatum".chars() {
            app.search_push(c);
        }
        app.search_finish();
        app.trade_toggle();
        for _ in 0..5 {
            app.trade_share_up();
        }

        let outcome = app.trade_outcome().unwrap();
        assert_eq!(outcome.share_pct, 20);
        assert!((outcome.net_vacated_fga - 10.0).abs() < 1e-9);
        assert!((outcome.points_change - 2.4).abs() < 1e-9);
        assert!((outcome.assists_change - 0.4).abs() < 1e-9);
        assert_eq!(outcome.projected.rebounds, outcome.age_only.rebounds);
    }

    #[test]
    fn search_moves_compare_slot_on_compare_tab() {
        let mut app = app();
        app.toggle_compare();
        assert_eq!(app.state.active_tab, MenuItem::Compare);
        app.switch_focus();

        app.search_start();
        for c in "JOKIC".chars() {
            app.search_push(c);
        }
        assert_eq!(app.state.selection.secondary, Some(4));
        assert_eq!(app.state.selection.primary, Some(1));

        app.toggle_compare();
        assert_eq!(app.state.active_tab, MenuItem::CurrentStats);
        assert!(!app.state.search.active);
    }

    #[test]
    fn min_games_change_keeps_qualifying_selection() {
        let mut app = app();
        app.state.selection.primary = Some(2);
        app.adjust_min_games(50);
        assert_eq!(app.state.season.min_games, 65);
        assert_eq!(app.state.selection.primary, Some(2));

        app.adjust_min_games(6);
        // Maxey (70) is out at 71 and Embiid (39) long gone, so the first name is used.
        assert_eq!(
            app.state.primary_player().map(|p| p.player_name.as_str()),
            Some("Jayson Tatum")
        );
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::Trade);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Trade);
    }
}
