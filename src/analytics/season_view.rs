use crate::analytics::metrics::Metric;
use crate::analytics::percentile::PercentileProfile;
use nba_stats_api::{PlayerSeasonRecord, SeasonTable};
use std::collections::HashSet;

pub const MAX_MIN_GAMES: u8 = 82;
pub const DEFAULT_MIN_GAMES: u8 = 15;

/// The games-filtered population of one season and its percentile profile.
///
/// Built from scratch for every (table, threshold) pair; there is no
/// incremental update, so ranks can never go stale against the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonView {
    pub season: String,
    pub min_games: u8,
    /// Players with at least `min_games` games, in table order.
    pub players: Vec<PlayerSeasonRecord>,
    /// Unique names of `players`, sorted; what the player picker lists.
    pub names: Vec<String>,
    pub profile: PercentileProfile,
}

impl SeasonView {
    pub fn build(table: &SeasonTable, min_games: u8) -> Self {
        let min_games = min_games.min(MAX_MIN_GAMES);
        let players: Vec<PlayerSeasonRecord> = table
            .players
            .iter()
            .filter(|p| p.games_played >= u32::from(min_games))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        let mut names: Vec<String> = players
            .iter()
            .filter(|p| seen.insert(p.player_name.as_str()))
            .map(|p| p.player_name.clone())
            .collect();
        names.sort();

        let profile = PercentileProfile::compute(&players, &Metric::ALL);

        Self {
            season: table.season.clone(),
            min_games,
            players,
            names,
            profile,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// First record under `name`, like the picker resolves it.
    pub fn player_by_name(&self, name: &str) -> Option<&PlayerSeasonRecord> {
        self.players.iter().find(|p| p.player_name == name)
    }

    pub fn player_by_id(&self, player_id: u32) -> Option<&PlayerSeasonRecord> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Picker position of a player, if they made the filter.
    pub fn name_index(&self, player_id: u32) -> Option<usize> {
        let player = self.player_by_id(player_id)?;
        self.names.iter().position(|n| *n == player.player_name)
    }

    /// Player at picker position `index`.
    pub fn player_at(&self, index: usize) -> Option<&PlayerSeasonRecord> {
        self.names.get(index).and_then(|name| self.player_by_name(name))
    }

    /// Percentiles of `player_id` in [`Metric::ALL`] order.
    pub fn percentiles(&self, player_id: u32) -> Option<&[f64]> {
        self.profile.scores(player_id)
    }

    /// First picker position whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Option<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.names
            .iter()
            .position(|n| n.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, name: &str, games: u32, minutes: f64) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_id: id,
            player_name: name.to_string(),
            games_played: games,
            minutes,
            ts_pct: 0.5 + f64::from(id) / 100.0,
            ..Default::default()
        }
    }

    fn table() -> SeasonTable {
        SeasonTable {
            season: "2023-24".into(),
            players: vec![
                player(1, "Zed Starter", 70, 34.0),
                player(2, "Amy Rotation", 40, 22.0),
                player(3, "Cal Cameo", 5, 40.0),
                player(4, "Bo Bench", 15, 10.0),
            ],
        }
    }

    #[test]
    fn filter_keeps_players_at_or_above_threshold() {
        let view = SeasonView::build(&table(), 15);
        let ids: Vec<u32> = view.players.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(view.names, vec!["Amy Rotation", "Bo Bench", "Zed Starter"]);
        assert!(view.profile.scores(3).is_none());
    }

    #[test]
    fn percentiles_use_filtered_population_only() {
        // Cal Cameo has the most minutes but only 5 games.
        let view = SeasonView::build(&table(), 15);
        assert_eq!(view.profile.score(1, Metric::Minutes), Some(100.0));
        assert_eq!(view.profile.score(3, Metric::Minutes), None);

        let everyone = SeasonView::build(&table(), 0);
        assert_eq!(everyone.profile.score(3, Metric::Minutes), Some(100.0));
        assert_eq!(everyone.profile.score(1, Metric::Minutes), Some(75.0));
    }

    #[test]
    fn changing_filter_keeps_raw_values() {
        let strict = SeasonView::build(&table(), 40);
        let loose = SeasonView::build(&table(), 0);
        for p in &strict.players {
            let same = loose.player_by_id(p.player_id).unwrap();
            assert_eq!(p, same);
        }
        assert_ne!(
            strict.profile.score(1, Metric::Minutes),
            loose.profile.score(1, Metric::Minutes)
        );
    }

    #[test]
    fn threshold_is_clamped() {
        let view = SeasonView::build(&table(), 200);
        assert_eq!(view.min_games, MAX_MIN_GAMES);
        assert!(view.is_empty());
        assert!(view.names.is_empty());
    }

    #[test]
    fn picker_lookups() {
        let view = SeasonView::build(&table(), 0);
        assert_eq!(view.player_at(0).map(|p| p.player_id), Some(2));
        assert_eq!(view.name_index(1), Some(3));
        assert_eq!(view.search("bench"), Some(1));
        assert_eq!(view.search("  "), None);
        assert_eq!(view.search("nobody"), None);
    }

    #[test]
    fn empty_table_builds_empty_view() {
        let view = SeasonView::build(&SeasonTable::empty("2019-20"), 15);
        assert!(view.is_empty());
        assert_eq!(view.profile.metrics().len(), 11);
        assert_eq!(view.season, "2019-20");
    }
}
