use crate::analytics::season_view::{MAX_MIN_GAMES, SeasonView};
use crate::analytics::trade::{TradeCandidates, TradeScenario};
use crate::app::MenuItem;
use crate::state::app_settings::AppSettings;
use nba_stats_api::{CareerRecord, PlayerSeasonRecord, SeasonTable, season_options};

// ---------------------------------------------------------------------------
// Season + games filter
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SeasonState {
    /// Newest first.
    pub options: Vec<String>,
    pub selected: usize,
    /// `None` until the selected season's table arrives.
    pub table: Option<SeasonTable>,
    pub view: SeasonView,
    pub min_games: u8,
}

impl SeasonState {
    pub fn new(options: Vec<String>, default_season: &str, min_games: u8) -> Self {
        let selected = options
            .iter()
            .position(|s| s == default_season)
            .unwrap_or(0);
        Self {
            options,
            selected,
            table: None,
            view: SeasonView::default(),
            min_games: min_games.min(MAX_MIN_GAMES),
        }
    }

    pub fn season(&self) -> &str {
        self.options.get(self.selected).map(String::as_str).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.table.is_none()
    }

    /// Step one season back in time. Returns whether the season changed.
    pub fn older(&mut self) -> bool {
        if self.selected + 1 >= self.options.len() {
            return false;
        }
        self.selected += 1;
        self.unload();
        true
    }

    pub fn newer(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.unload();
        true
    }

    pub fn load(&mut self, table: SeasonTable) {
        self.view = SeasonView::build(&table, self.min_games);
        self.table = Some(table);
    }

    /// Move the games threshold by `delta`, clamped to 0..=82, and rebuild
    /// the filtered view. Returns whether the threshold changed.
    pub fn adjust_min_games(&mut self, delta: i16) -> bool {
        let next = (i16::from(self.min_games) + delta).clamp(0, i16::from(MAX_MIN_GAMES)) as u8;
        if next == self.min_games {
            return false;
        }
        self.min_games = next;
        if let Some(table) = &self.table {
            self.view = SeasonView::build(table, self.min_games);
        }
        true
    }

    /// Roster split around `primary`, over the whole season table.
    pub fn trade_candidates(&self, primary: Option<u32>) -> Option<TradeCandidates<'_>> {
        let table = self.table.as_ref()?;
        let subject = self.view.player_by_id(primary?)?;
        Some(TradeCandidates::for_subject(table, subject))
    }

    fn unload(&mut self) {
        self.table = None;
        self.view = SeasonView::default();
    }
}

// ---------------------------------------------------------------------------
// Player selection (primary + comparison slot)
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CompareSlot {
    #[default]
    Primary,
    Secondary,
}

/// Selected players, tracked by id so a selection survives filter changes.
#[derive(Debug, Default)]
pub struct SelectionState {
    pub primary: Option<u32>,
    pub secondary: Option<u32>,
    pub slot: CompareSlot,
}

impl SelectionState {
    /// Drop selections that fell out of `view` and fill empty slots.
    ///
    /// The primary slot falls back to `default_player` when it made the
    /// filter, else the first name; the secondary slot to the second name.
    /// Returns whether the primary player changed.
    pub fn reconcile(&mut self, view: &SeasonView, default_player: Option<&str>) -> bool {
        let before = self.primary;

        if self.primary.and_then(|id| view.player_by_id(id)).is_none() {
            self.primary = default_player
                .and_then(|name| view.player_by_name(name))
                .or_else(|| view.player_at(0))
                .map(|p| p.player_id);
        }
        if self.secondary.and_then(|id| view.player_by_id(id)).is_none() {
            self.secondary = view
                .player_at(1)
                .or_else(|| view.player_at(0))
                .map(|p| p.player_id);
        }

        before != self.primary
    }

    /// The slot keys act on: the comparison slot only on the Compare tab.
    pub fn active_slot(&self, tab: MenuItem) -> CompareSlot {
        if tab == MenuItem::Compare { self.slot } else { CompareSlot::Primary }
    }

    pub fn get(&self, slot: CompareSlot) -> Option<u32> {
        match slot {
            CompareSlot::Primary => self.primary,
            CompareSlot::Secondary => self.secondary,
        }
    }

    pub fn set(&mut self, slot: CompareSlot, player_id: u32) {
        match slot {
            CompareSlot::Primary => self.primary = Some(player_id),
            CompareSlot::Secondary => self.secondary = Some(player_id),
        }
    }

    pub fn switch_slot(&mut self) {
        self.slot = match self.slot {
            CompareSlot::Primary => CompareSlot::Secondary,
            CompareSlot::Secondary => CompareSlot::Primary,
        };
    }

    /// Move `slot` through the picker by `delta` names, stopping at the ends.
    pub fn step(&mut self, view: &SeasonView, slot: CompareSlot, delta: isize) {
        if view.names.is_empty() {
            return;
        }
        let current = self
            .get(slot)
            .and_then(|id| view.name_index(id))
            .unwrap_or(0);
        let last = view.names.len() as isize - 1;
        let next = (current as isize + delta).clamp(0, last) as usize;
        if let Some(player) = view.player_at(next) {
            self.set(slot, player.player_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Incremental search
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

impl SearchState {
    pub fn start(&mut self) {
        self.active = true;
        self.query.clear();
    }

    pub fn finish(&mut self) {
        self.active = false;
    }
}

// ---------------------------------------------------------------------------
// Trade simulator
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TradePane {
    #[default]
    Outgoing,
    Incoming,
}

#[derive(Debug, Default)]
pub struct TradeState {
    pub scenario: TradeScenario,
    pub pane: TradePane,
    pub outgoing_cursor: usize,
    pub incoming_cursor: usize,
}

impl TradeState {
    pub fn new(share_pct: u8) -> Self {
        Self {
            scenario: TradeScenario::new(share_pct),
            ..Self::default()
        }
    }

    /// Forget the picks but keep the chosen share.
    pub fn reset(&mut self) {
        self.scenario.clear();
        self.outgoing_cursor = 0;
        self.incoming_cursor = 0;
    }

    pub fn switch_pane(&mut self) {
        self.pane = match self.pane {
            TradePane::Outgoing => TradePane::Incoming,
            TradePane::Incoming => TradePane::Outgoing,
        };
    }

    pub fn cursor(&self) -> usize {
        match self.pane {
            TradePane::Outgoing => self.outgoing_cursor,
            TradePane::Incoming => self.incoming_cursor,
        }
    }

    pub fn set_cursor(&mut self, index: usize) {
        match self.pane {
            TradePane::Outgoing => self.outgoing_cursor = index,
            TradePane::Incoming => self.incoming_cursor = index,
        }
    }

    pub fn step(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.set_cursor(0);
            return;
        }
        let next = (self.cursor() as isize + delta).clamp(0, len as isize - 1) as usize;
        self.set_cursor(next);
    }

    /// Players listed in the focused pane.
    pub fn pane_players<'a>(
        &self,
        candidates: &TradeCandidates<'a>,
    ) -> Vec<&'a PlayerSeasonRecord> {
        match self.pane {
            TradePane::Outgoing => candidates.teammates.clone(),
            TradePane::Incoming => candidates.incoming.clone(),
        }
    }

    /// Toggle the player under the cursor in the focused pane.
    pub fn toggle_at_cursor(&mut self, candidates: &TradeCandidates<'_>) {
        let players = self.pane_players(candidates);
        let Some(player) = players.get(self.cursor()) else {
            return;
        };
        match self.pane {
            TradePane::Outgoing => self.scenario.toggle_outgoing(player.player_id),
            TradePane::Incoming => self.scenario.toggle_incoming(player.player_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Career trajectory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CareerState {
    /// The player whose career is shown or in flight.
    pub requested: Option<u32>,
    pub record: Option<CareerRecord>,
    pub error: Option<String>,
}

impl CareerState {
    pub fn is_current(&self, player_id: u32) -> bool {
        self.requested == Some(player_id)
    }

    pub fn is_loading(&self) -> bool {
        self.requested.is_some() && self.record.is_none()
    }

    pub fn request(&mut self, player_id: u32) {
        self.requested = Some(player_id);
        self.record = None;
        self.error = None;
    }

    /// Store `career` unless the selection moved on. Returns whether it was kept.
    pub fn accept(&mut self, career: CareerRecord) -> bool {
        if !self.is_current(career.player_id) {
            return false;
        }
        self.error = None;
        self.record = Some(career);
        true
    }

    /// A failed fetch shows as an empty career.
    pub fn fail(&mut self, player_id: u32, message: String) -> bool {
        if !self.is_current(player_id) {
            return false;
        }
        self.record = Some(CareerRecord::empty(player_id));
        self.error = Some(message);
        true
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub season: SeasonState,
    pub selection: SelectionState,
    pub search: SearchState,
    pub trade: TradeState,
    pub career: CareerState,
}

impl AppState {
    pub fn new(settings: &AppSettings, current_year: i32) -> Self {
        Self {
            season: SeasonState::new(
                season_options(current_year),
                &settings.default_season,
                settings.min_games,
            ),
            trade: TradeState::new(settings.share_pct),
            ..Self::default()
        }
    }

    pub fn primary_player(&self) -> Option<&PlayerSeasonRecord> {
        self.selection
            .primary
            .and_then(|id| self.season.view.player_by_id(id))
    }

    pub fn secondary_player(&self) -> Option<&PlayerSeasonRecord> {
        self.selection
            .secondary
            .and_then(|id| self.season.view.player_by_id(id))
    }

    pub fn trade_candidates(&self) -> Option<TradeCandidates<'_>> {
        self.season.trade_candidates(self.selection.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, name: &str, team: u32, games: u32) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_id: id,
            player_name: name.to_string(),
            team_id: team,
            games_played: games,
            fga: f64::from(id),
            ..Default::default()
        }
    }

    fn table(season: &str) -> SeasonTable {
        SeasonTable {
            season: season.to_string(),
            players: vec![
                player(10, "Joel Embiid", 1, 39),
                player(11, "Tyrese Maxey", 1, 70),
                player(20, "Jayson Tatum", 2, 74),
                player(21, "Jaylen Brown", 2, 10),
                player(30, "Nikola Jokic", 3, 79),
            ],
        }
    }

    fn state() -> AppState {
        AppState::new(&AppSettings::default(), 2025)
    }

    #[test]
    fn starts_on_default_season_when_listed() {
        let s = state();
        assert_eq!(s.season.options.first().map(String::as_str), Some("2025-26"));
        assert_eq!(s.season.season(), "2023-24");
        assert!(s.season.is_loading());
    }

    #[test]
    fn falls_back_to_newest_season() {
        let settings = AppSettings {
            default_season: "1999-00".into(),
            ..AppSettings::default()
        };
        let s = AppState::new(&settings, 2025);
        assert_eq!(s.season.season(), "2025-26");
    }

    #[test]
    fn season_stepping_stops_at_the_ends() {
        let mut s = state();
        s.season.load(table("2023-24"));
        assert!(s.season.newer());
        assert!(s.season.is_loading());
        assert!(s.season.newer());
        assert_eq!(s.season.season(), "2025-26");
        assert!(!s.season.newer());

        s.season.selected = s.season.options.len() - 1;
        assert_eq!(s.season.season(), "2015-16");
        assert!(!s.season.older());
    }

    #[test]
    fn reconcile_prefers_default_player() {
        let mut s = state();
        s.season.load(table("2023-24"));
        let changed = s
            .selection
            .reconcile(&s.season.view, Some("Joel Embiid"));
        assert!(changed);
        assert_eq!(s.selection.primary, Some(10));
        // Names run Jayson Tatum, Joel Embiid, ...; the second one fills slot two.
        assert_eq!(s.selection.secondary, Some(10));
        assert_eq!(s.season.view.names[0], "Jayson Tatum");
    }

    #[test]
    fn selection_survives_filter_while_player_qualifies() {
        let mut s = state();
        s.season.load(table("2023-24"));
        s.selection.reconcile(&s.season.view, Some("Joel Embiid"));
        s.selection.primary = Some(11);

        assert!(s.season.adjust_min_games(40));
        assert!(!s.selection.reconcile(&s.season.view, Some("Joel Embiid")));
        assert_eq!(s.selection.primary, Some(11));

        // Maxey (70 games) drops out at 75; Embiid is gone too, so the first
        // name takes over.
        assert!(s.season.adjust_min_games(20));
        assert_eq!(s.season.min_games, 75);
        assert!(s.selection.reconcile(&s.season.view, Some("Joel Embiid")));
        assert_eq!(s.selection.primary, Some(30));
    }

    #[test]
    fn min_games_is_clamped() {
        let mut s = state();
        assert!(s.season.adjust_min_games(-100));
        assert_eq!(s.season.min_games, 0);
        assert!(!s.season.adjust_min_games(-1));
        assert!(s.season.adjust_min_games(500));
        assert_eq!(s.season.min_games, 82);
    }

    #[test]
    fn empty_view_clears_selection() {
        let mut s = state();
        s.season.load(SeasonTable::empty("2023-24"));
        s.selection.reconcile(&s.season.view, Some("Joel Embiid"));
        assert_eq!(s.selection.primary, None);
        assert_eq!(s.selection.secondary, None);
        assert!(s.primary_player().is_none());
        assert!(s.trade_candidates().is_none());
    }

    #[test]
    fn stepping_moves_through_sorted_names() {
        let mut s = state();
        s.season.load(table("2023-24"));
        s.selection.reconcile(&s.season.view, Some("Joel Embiid"));

        s.selection.step(&s.season.view, CompareSlot::Primary, 1);
        assert_eq!(s.primary_player().map(|p| p.player_name.as_str()), Some("Nikola Jokic"));
        s.selection.step(&s.season.view, CompareSlot::Primary, 10);
        assert_eq!(s.primary_player().map(|p| p.player_name.as_str()), Some("Tyrese Maxey"));
        s.selection.step(&s.season.view, CompareSlot::Primary, -10);
        assert_eq!(s.primary_player().map(|p| p.player_name.as_str()), Some("Jayson Tatum"));
    }

    #[test]
    fn compare_slot_only_applies_on_compare_tab() {
        let mut sel = SelectionState::default();
        sel.switch_slot();
        assert_eq!(sel.active_slot(MenuItem::Compare), CompareSlot::Secondary);
        assert_eq!(sel.active_slot(MenuItem::CurrentStats), CompareSlot::Primary);
    }

    #[test]
    fn trade_candidates_use_full_table() {
        let mut s = state();
        s.season.load(table("2023-24"));
        s.season.adjust_min_games(45);
        s.selection.reconcile(&s.season.view, None);
        s.selection.primary = Some(20);

        let candidates = s.trade_candidates().unwrap();
        // Jaylen Brown played 10 games but is still on the roster.
        let teammates: Vec<u32> = candidates.teammates.iter().map(|p| p.player_id).collect();
        assert_eq!(teammates, vec![21]);
        assert!(candidates.incoming.iter().all(|p| p.team_id != 2));
        assert_eq!(candidates.incoming.len(), 3);
    }

    #[test]
    fn trade_toggle_follows_pane_and_cursor() {
        let mut s = state();
        s.season.load(table("2023-24"));
        s.selection.reconcile(&s.season.view, Some("Joel Embiid"));

        let candidates = s.season.trade_candidates(s.selection.primary).unwrap();
        s.trade.toggle_at_cursor(&candidates);
        s.trade.switch_pane();
        s.trade.step(1, candidates.incoming.len());
        s.trade.toggle_at_cursor(&candidates);

        assert!(s.trade.scenario.outgoing.contains(&11));
        // Incoming sorted: Jaylen Brown, Jayson Tatum, Nikola Jokic.
        assert!(s.trade.scenario.incoming.contains(&20));

        s.trade.step(50, candidates.incoming.len());
        assert_eq!(s.trade.incoming_cursor, 2);

        s.trade.reset();
        assert!(!s.trade.scenario.is_active());
        assert_eq!(s.trade.scenario.share_pct, 15);
    }

    #[test]
    fn stale_career_responses_are_dropped() {
        let mut career = CareerState::default();
        career.request(10);
        assert!(career.is_loading());
        career.request(11);

        assert!(!career.accept(CareerRecord::empty(10)));
        assert!(career.record.is_none());
        assert!(!career.fail(10, "boom".into()));

        assert!(career.accept(CareerRecord::empty(11)));
        assert!(!career.is_loading());
    }

    #[test]
    fn failed_career_shows_empty() {
        let mut career = CareerState::default();
        career.request(7);
        assert!(career.fail(7, "timed out".into()));
        assert!(career.record.as_ref().is_some_and(CareerRecord::is_empty));
        assert_eq!(career.error.as_deref(), Some("timed out"));
    }
}
