use crate::analytics::projection::ProjectionResult;
use nba_stats_api::{PlayerSeasonRecord, SeasonTable};
use serde::Deserialize;
use std::collections::BTreeSet;

pub const MAX_SHARE_PCT: u8 = 50;
pub const DEFAULT_SHARE_PCT: u8 = 15;

pub const NO_SCENARIO_MESSAGE: &str = "No scenario active. Showing Age-Adjusted Baseline.";

/// Heuristic coefficients of the volume reallocation model.
///
/// These are fixed rules of thumb, not fitted values: the point multiplier
/// does not depend on the subject's own shooting efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeModel {
    /// Points per extra shot when the subject gains volume.
    pub gain_efficiency: f64,
    /// Points per lost shot when the subject gives volume up.
    pub loss_efficiency: f64,
    /// Assists per shot of volume change, either direction.
    pub assist_rate: f64,
}

impl Default for TradeModel {
    fn default() -> Self {
        Self {
            gain_efficiency: 1.2,
            loss_efficiency: 1.1,
            assist_rate: 0.2,
        }
    }
}

impl TradeModel {
    pub fn efficiency(&self, volume_change: f64) -> f64 {
        if volume_change > 0.0 {
            self.gain_efficiency
        } else {
            self.loss_efficiency
        }
    }
}

/// Current what-if selection. Rebuilt from user input; holds no history.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeScenario {
    pub outgoing: BTreeSet<u32>,
    pub incoming: BTreeSet<u32>,
    pub share_pct: u8,
}

impl Default for TradeScenario {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_PCT)
    }
}

impl TradeScenario {
    pub fn new(share_pct: u8) -> Self {
        Self {
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
            share_pct: share_pct.min(MAX_SHARE_PCT),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.outgoing.is_empty() || !self.incoming.is_empty()
    }

    /// Add or remove an outgoing player. A player moved here leaves the
    /// incoming set, so nobody is ever on both sides.
    pub fn toggle_outgoing(&mut self, player_id: u32) {
        if !self.outgoing.remove(&player_id) {
            self.incoming.remove(&player_id);
            self.outgoing.insert(player_id);
        }
    }

    pub fn toggle_incoming(&mut self, player_id: u32) {
        if !self.incoming.remove(&player_id) {
            self.outgoing.remove(&player_id);
            self.incoming.insert(player_id);
        }
    }

    /// Drop both player sets; the share stays where the user left it.
    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
    }

    pub fn set_share(&mut self, share_pct: u8) {
        self.share_pct = share_pct.min(MAX_SHARE_PCT);
    }

    pub fn increase_share(&mut self) {
        self.set_share(self.share_pct.saturating_add(1));
    }

    pub fn decrease_share(&mut self) {
        self.set_share(self.share_pct.saturating_sub(1));
    }

    pub fn share_rate(&self) -> f64 {
        f64::from(self.share_pct) / 100.0
    }
}

/// Who can be traded away and who can be brought in, for one subject.
#[derive(Debug, Clone, Default)]
pub struct TradeCandidates<'a> {
    /// The subject's teammates, sorted by name.
    pub teammates: Vec<&'a PlayerSeasonRecord>,
    /// Everybody not on the subject's roster, sorted by name.
    pub incoming: Vec<&'a PlayerSeasonRecord>,
}

impl<'a> TradeCandidates<'a> {
    /// Split the full season table (not the games-filtered view) around the
    /// subject's roster.
    pub fn for_subject(table: &'a SeasonTable, subject: &PlayerSeasonRecord) -> Self {
        let (mut teammates, mut incoming): (Vec<_>, Vec<_>) = table
            .players
            .iter()
            .filter(|p| p.player_id != subject.player_id)
            .partition(|p| p.team_id == subject.team_id);

        teammates.sort_by(|a, b| a.player_name.cmp(&b.player_name));
        incoming.sort_by(|a, b| a.player_name.cmp(&b.player_name));
        Self { teammates, incoming }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Surplus,
    Deficit,
    Neutral,
}

impl VolumeDirection {
    pub fn from_net(net_vacated_fga: f64) -> Self {
        if net_vacated_fga > 0.0 {
            VolumeDirection::Surplus
        } else if net_vacated_fga < 0.0 {
            VolumeDirection::Deficit
        } else {
            VolumeDirection::Neutral
        }
    }

    pub fn slider_label(&self) -> &'static str {
        match self {
            VolumeDirection::Surplus => "Usage Absorption %",
            VolumeDirection::Deficit => "Usage Sacrifice %",
            VolumeDirection::Neutral => "Impact Share %",
        }
    }

    pub fn slider_help(&self, net_vacated_fga: f64, subject: &str) -> String {
        match self {
            VolumeDirection::Surplus => format!(
                "Surplus of {net_vacated_fga:.1} shots available. What % does {subject} absorb?"
            ),
            VolumeDirection::Deficit => format!(
                "Deficit of {:.1} shots. What % does {subject} give up?",
                net_vacated_fga.abs()
            ),
            VolumeDirection::Neutral => "No net change in shot volume.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine {
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
}

impl StatLine {
    pub fn of(player: &PlayerSeasonRecord) -> Self {
        Self {
            points: player.points,
            assists: player.assists,
            rebounds: player.rebounds,
        }
    }

    pub fn from_projection(projection: &ProjectionResult) -> Self {
        Self {
            points: projection.points,
            assists: projection.assists,
            rebounds: projection.rebounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeMover {
    pub name: String,
    pub fga: f64,
}

impl TradeMover {
    fn describe(&self) -> String {
        format!("{} ({:.1})", self.name, self.fga)
    }
}

/// Everything the trade view shows for one subject and scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub subject: String,
    pub active: bool,
    pub leaving: Vec<TradeMover>,
    pub joining: Vec<TradeMover>,
    pub share_pct: u8,
    /// Outgoing FGA minus incoming FGA.
    pub net_vacated_fga: f64,
    /// The subject's share of the net volume.
    pub volume_change: f64,
    pub points_change: f64,
    pub assists_change: f64,
    /// The season just played.
    pub pre_trade: StatLine,
    /// Age-adjusted projection without any trade.
    pub age_only: StatLine,
    /// Age-adjusted projection plus the trade deltas. Rebounds never move.
    pub projected: StatLine,
}

/// Reallocate the net vacated shot volume onto the subject.
///
/// Only outgoing players who really are teammates and incoming players who
/// really are off-roster count, whatever ids the scenario holds.
pub fn evaluate(
    candidates: &TradeCandidates<'_>,
    subject: &PlayerSeasonRecord,
    scenario: &TradeScenario,
    base_projection: &ProjectionResult,
    model: &TradeModel,
) -> TradeOutcome {
    let leaving: Vec<TradeMover> = candidates
        .teammates
        .iter()
        .filter(|p| scenario.outgoing.contains(&p.player_id))
        .map(|p| TradeMover { name: p.player_name.clone(), fga: p.fga })
        .collect();
    let joining: Vec<TradeMover> = candidates
        .incoming
        .iter()
        .filter(|p| scenario.incoming.contains(&p.player_id))
        .map(|p| TradeMover { name: p.player_name.clone(), fga: p.fga })
        .collect();

    let net_vacated_fga = leaving.iter().map(|m| m.fga).sum::<f64>()
        - joining.iter().map(|m| m.fga).sum::<f64>();

    let age_only = StatLine::from_projection(base_projection);
    let mut projected = age_only;
    let mut volume_change = 0.0;
    let mut points_change = 0.0;
    let mut assists_change = 0.0;

    // Picks that are no longer on either list don't make a scenario.
    let active = !leaving.is_empty() || !joining.is_empty();
    if active {
        volume_change = net_vacated_fga * scenario.share_rate();
        points_change = volume_change * model.efficiency(volume_change);
        assists_change = volume_change * model.assist_rate;
        projected.points += points_change;
        projected.assists += assists_change;
    }

    TradeOutcome {
        subject: subject.player_name.clone(),
        active,
        leaving,
        joining,
        share_pct: scenario.share_pct,
        net_vacated_fga,
        volume_change,
        points_change,
        assists_change,
        pre_trade: StatLine::of(subject),
        age_only,
        projected,
    }
}

impl TradeOutcome {
    pub fn direction(&self) -> VolumeDirection {
        VolumeDirection::from_net(self.net_vacated_fga)
    }

    pub fn severity(&self) -> Severity {
        if self.net_vacated_fga < 0.0 {
            Severity::Warning
        } else {
            Severity::Success
        }
    }

    /// Projected minus last season, per stat.
    pub fn deltas(&self) -> StatLine {
        StatLine {
            points: self.projected.points - self.pre_trade.points,
            assists: self.projected.assists - self.pre_trade.assists,
            rebounds: self.projected.rebounds - self.pre_trade.rebounds,
        }
    }

    /// One-line read of the subject's volume change, once a scenario exists.
    pub fn volume_caption(&self) -> Option<String> {
        if !self.active {
            return None;
        }
        let caption = if self.volume_change > 0.0 {
            format!("Projection: {} gains +{:.1} FGA", self.subject, self.volume_change)
        } else if self.volume_change < 0.0 {
            format!("Projection: {} loses {:.1} FGA", self.subject, self.volume_change)
        } else {
            "No significant volume change.".to_string()
        };
        Some(caption)
    }

    pub fn message_lines(&self) -> Vec<String> {
        if !self.active {
            return vec![NO_SCENARIO_MESSAGE.to_string()];
        }

        let mut lines = Vec::new();
        if !self.leaving.is_empty() {
            let names: Vec<String> = self.leaving.iter().map(TradeMover::describe).collect();
            lines.push(format!("Leaving: {}", names.join(", ")));
        }
        if !self.joining.is_empty() {
            let names: Vec<String> = self.joining.iter().map(TradeMover::describe).collect();
            lines.push(format!("Joining: {}", names.join(", ")));
        }
        lines.push(format!("Net Team Volume: {:+.1} Shots", self.net_vacated_fga));
        lines.push(format!(
            "{} Impact: {:+.1} FGA ({}% share)",
            self.subject, self.volume_change, self.share_pct
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::projection::project;

    const EPS: f64 = 1e-9;

    fn player(id: u32, name: &str, team_id: u32, fga: f64) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_id: id,
            player_name: name.to_string(),
            team_id,
            age: 27.0,
            points: 20.0,
            assists: 5.0,
            rebounds: 7.0,
            fga,
            ..Default::default()
        }
    }

    fn table() -> SeasonTable {
        SeasonTable {
            season: "2023-24".into(),
            players: vec![
                player(1, "Subject", 10, 16.0),
                player(2, "Starter", 10, 15.0),
                player(3, "Backup", 10, 5.0),
                player(4, "Outsider", 20, 5.0),
                player(5, "Volume Scorer", 30, 10.0),
                player(6, "Another Outsider", 20, 2.0),
            ],
        }
    }

    fn run(table: &SeasonTable, scenario: &TradeScenario) -> TradeOutcome {
        let subject = table.find(1).unwrap();
        let candidates = TradeCandidates::for_subject(table, subject);
        let base = project(subject, None);
        evaluate(&candidates, subject, scenario, &base, &TradeModel::default())
    }

    #[test]
    fn candidates_split_roster_from_everyone_else() {
        let table = table();
        let subject = table.find(1).unwrap();
        let candidates = TradeCandidates::for_subject(&table, subject);

        let teammates: Vec<_> = candidates.teammates.iter().map(|p| p.player_name.as_str()).collect();
        let incoming: Vec<_> = candidates.incoming.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(teammates, vec!["Backup", "Starter"]);
        assert_eq!(incoming, vec!["Another Outsider", "Outsider", "Volume Scorer"]);
    }

    #[test]
    fn roster_members_never_appear_as_incoming() {
        let table = table();
        let subject = table.find(1).unwrap();
        let candidates = TradeCandidates::for_subject(&table, subject);
        for p in &candidates.incoming {
            assert_ne!(p.team_id, subject.team_id);
            assert!(candidates.teammates.iter().all(|t| t.player_id != p.player_id));
            assert_ne!(p.player_id, subject.player_id);
        }
    }

    #[test]
    fn empty_scenario_collapses_to_age_only_baseline() {
        let table = table();
        let outcome = run(&table, &TradeScenario::new(20));

        assert!(!outcome.active);
        assert_eq!(outcome.net_vacated_fga, 0.0);
        assert_eq!(outcome.projected, outcome.age_only);
        assert_eq!(outcome.message_lines(), vec![NO_SCENARIO_MESSAGE.to_string()]);
        assert_eq!(outcome.volume_caption(), None);
        assert_eq!(outcome.severity(), Severity::Success);
    }

    #[test]
    fn surplus_scenario_uses_gain_efficiency() {
        let table = table();
        let mut scenario = TradeScenario::new(20);
        scenario.toggle_outgoing(2); // 15.0 FGA
        scenario.toggle_incoming(4); // 5.0 FGA
        let outcome = run(&table, &scenario);

        assert!((outcome.net_vacated_fga - 10.0).abs() < EPS);
        assert!((outcome.volume_change - 2.0).abs() < EPS);
        assert!((outcome.points_change - 2.4).abs() < EPS);
        assert!((outcome.assists_change - 0.4).abs() < EPS);
        assert!((outcome.projected.points - (outcome.age_only.points + 2.4)).abs() < EPS);
        assert!((outcome.projected.assists - (outcome.age_only.assists + 0.4)).abs() < EPS);
        assert_eq!(outcome.projected.rebounds, outcome.age_only.rebounds);
        assert_eq!(outcome.direction(), VolumeDirection::Surplus);
        assert_eq!(outcome.severity(), Severity::Success);
    }

    #[test]
    fn deficit_scenario_uses_loss_efficiency() {
        let table = table();
        let mut scenario = TradeScenario::new(50);
        scenario.toggle_outgoing(3); // 5.0 FGA
        scenario.toggle_incoming(5); // 10.0 FGA
        let outcome = run(&table, &scenario);

        assert!((outcome.net_vacated_fga + 5.0).abs() < EPS);
        assert!((outcome.volume_change + 2.5).abs() < EPS);
        assert!((outcome.points_change + 2.75).abs() < EPS);
        assert!((outcome.assists_change + 0.5).abs() < EPS);
        assert_eq!(outcome.projected.rebounds, outcome.age_only.rebounds);
        assert_eq!(outcome.direction(), VolumeDirection::Deficit);
        assert_eq!(outcome.severity(), Severity::Warning);
        assert_eq!(
            outcome.volume_caption().as_deref(),
            Some("Projection: Subject loses -2.5 FGA")
        );
    }

    #[test]
    fn multiple_movers_sum_their_volume() {
        let table = table();
        let mut scenario = TradeScenario::new(10);
        scenario.toggle_outgoing(2);
        scenario.toggle_outgoing(3);
        scenario.toggle_incoming(6);
        let outcome = run(&table, &scenario);

        assert!((outcome.net_vacated_fga - 18.0).abs() < EPS);
        assert_eq!(
            outcome.message_lines(),
            vec![
                "Leaving: Backup (5.0), Starter (15.0)".to_string(),
                "Joining: Another Outsider (2.0)".to_string(),
                "Net Team Volume: +18.0 Shots".to_string(),
                "Subject Impact: +1.8 FGA (10% share)".to_string(),
            ]
        );
    }

    #[test]
    fn player_cannot_be_both_outgoing_and_incoming() {
        let mut scenario = TradeScenario::default();
        scenario.toggle_outgoing(2);
        scenario.toggle_incoming(2);
        assert!(!scenario.outgoing.contains(&2));
        assert!(scenario.incoming.contains(&2));

        scenario.toggle_outgoing(2);
        assert!(scenario.outgoing.contains(&2));
        assert!(!scenario.incoming.contains(&2));
    }

    #[test]
    fn ids_outside_the_candidate_lists_are_ignored() {
        let table = table();
        let mut scenario = TradeScenario::new(20);
        // A non-teammate as "outgoing" and a teammate as "incoming".
        scenario.toggle_outgoing(5);
        scenario.toggle_incoming(3);
        let outcome = run(&table, &scenario);

        assert!(outcome.leaving.is_empty());
        assert!(outcome.joining.is_empty());
        assert_eq!(outcome.net_vacated_fga, 0.0);
        assert_eq!(outcome.projected.points, outcome.age_only.points);
        assert!(!outcome.active);
        assert_eq!(outcome.message_lines(), vec![NO_SCENARIO_MESSAGE.to_string()]);
        assert_eq!(outcome.volume_caption(), None);
    }

    #[test]
    fn balanced_trade_is_active_but_neutral() {
        let table = table();
        let mut scenario = TradeScenario::new(30);
        scenario.toggle_outgoing(3); // 5.0
        scenario.toggle_incoming(4); // 5.0
        let outcome = run(&table, &scenario);

        assert!(outcome.active);
        assert_eq!(outcome.direction(), VolumeDirection::Neutral);
        assert_eq!(outcome.volume_caption().as_deref(), Some("No significant volume change."));
        assert_eq!(outcome.projected, outcome.age_only);
    }

    #[test]
    fn share_is_clamped_to_fifty_percent() {
        let mut scenario = TradeScenario::new(80);
        assert_eq!(scenario.share_pct, MAX_SHARE_PCT);
        scenario.increase_share();
        assert_eq!(scenario.share_pct, MAX_SHARE_PCT);
        scenario.set_share(0);
        scenario.decrease_share();
        assert_eq!(scenario.share_pct, 0);
    }

    #[test]
    fn clear_keeps_share() {
        let mut scenario = TradeScenario::new(25);
        scenario.toggle_outgoing(2);
        scenario.clear();
        assert!(!scenario.is_active());
        assert_eq!(scenario.share_pct, 25);
    }

    #[test]
    fn deltas_compare_against_last_season() {
        let table = table();
        let outcome = run(&table, &TradeScenario::default());
        // Age 27 sits on the plateau, so nothing moves.
        assert_eq!(outcome.deltas(), StatLine::default());
    }

    #[test]
    fn slider_copy_follows_direction() {
        assert_eq!(VolumeDirection::from_net(3.0).slider_label(), "Usage Absorption %");
        assert_eq!(VolumeDirection::from_net(-3.0).slider_label(), "Usage Sacrifice %");
        assert_eq!(VolumeDirection::from_net(0.0).slider_label(), "Impact Share %");
        assert_eq!(
            VolumeDirection::Deficit.slider_help(-4.26, "Subject"),
            "Deficit of 4.3 shots. What % does Subject give up?"
        );
    }

    #[test]
    fn custom_model_coefficients_apply() {
        let table = table();
        let subject = table.find(1).unwrap();
        let candidates = TradeCandidates::for_subject(&table, subject);
        let base = project(subject, None);
        let model = TradeModel { gain_efficiency: 1.5, loss_efficiency: 1.0, assist_rate: 0.0 };

        let mut scenario = TradeScenario::new(50);
        scenario.toggle_outgoing(3); // 5.0 FGA → +2.5 volume
        let outcome = evaluate(&candidates, subject, &scenario, &base, &model);
        assert!((outcome.points_change - 3.75).abs() < EPS);
        assert_eq!(outcome.assists_change, 0.0);
    }
}
