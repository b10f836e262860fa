pub mod client;
pub mod stats;

use serde::{Deserialize, Serialize};

/// Oldest season offered in the season picker.
pub const FIRST_SEASON_YEAR: i32 = 2015;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the stats.nba.com wire format
// ---------------------------------------------------------------------------

/// One player's season: per-game box score numbers joined with the per-36
/// and advanced tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonRecord {
    pub player_id: u32,
    pub player_name: String,
    pub team_id: u32,
    pub team_abbreviation: String,
    pub age: f64,
    pub games_played: u32,
    /// Minutes per game.
    pub minutes: f64,

    // Per-game counting stats
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fta: f64,
    pub steals: f64,
    pub blocks: f64,
    pub fg3_pct: f64,

    // Per-36 pace
    pub points_per36: f64,
    pub steals_per36: f64,
    pub blocks_per36: f64,

    // Advanced rates (fractions, 0.0–1.0)
    pub ts_pct: f64,
    pub efg_pct: f64,
    pub ast_pct: f64,
    pub oreb_pct: f64,
    pub dreb_pct: f64,

    /// Free throw attempts per field goal attempt.
    pub ft_rate: f64,
}

/// All players of one season, in the order the per-game table returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTable {
    pub season: String,
    pub players: Vec<PlayerSeasonRecord>,
}

impl SeasonTable {
    pub fn empty(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            players: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn find(&self, player_id: u32) -> Option<&PlayerSeasonRecord> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&PlayerSeasonRecord> {
        self.players.iter().find(|p| p.player_name == name)
    }
}

/// One row of a player's career table (regular season totals).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerSeason {
    pub season_id: String,
    pub team_abbreviation: String,
    pub player_age: f64,
    pub games_played: u32,
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub ppg: f64,
    pub apg: f64,
    pub rpg: f64,
}

impl CareerSeason {
    /// Build a row from season totals, deriving the per-game rates.
    pub fn from_totals(
        season_id: impl Into<String>,
        team_abbreviation: impl Into<String>,
        player_age: f64,
        games_played: u32,
        points: f64,
        assists: f64,
        rebounds: f64,
    ) -> Self {
        Self {
            season_id: season_id.into(),
            team_abbreviation: team_abbreviation.into(),
            player_age,
            games_played,
            points,
            assists,
            rebounds,
            ppg: per_game(points, games_played),
            apg: per_game(assists, games_played),
            rpg: per_game(rebounds, games_played),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareerRecord {
    pub player_id: u32,
    pub seasons: Vec<CareerSeason>,
}

impl CareerRecord {
    pub fn empty(player_id: u32) -> Self {
        Self {
            player_id,
            seasons: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Free throw rate (FTA / FGA). Zero attempts count as one.
pub fn free_throw_rate(fta: f64, fga: f64) -> f64 {
    let denominator = if fga == 0.0 { 1.0 } else { fga };
    fta / denominator
}

/// Season total divided by games, rounded to one decimal. Zero games count as one.
pub fn per_game(total: f64, games_played: u32) -> f64 {
    let games = f64::from(games_played.max(1));
    (total / games * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Season identifiers
// ---------------------------------------------------------------------------

/// `2023` → `"2023-24"`.
pub fn season_label(start_year: i32) -> String {
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}

/// Newest first, from `current_year` down to [`FIRST_SEASON_YEAR`].
pub fn season_options(current_year: i32) -> Vec<String> {
    (FIRST_SEASON_YEAR..=current_year)
        .rev()
        .map(season_label)
        .collect()
}
