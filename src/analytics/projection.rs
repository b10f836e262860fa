use nba_stats_api::PlayerSeasonRecord;

pub const YOUNG_MULTIPLIER: f64 = 1.03;
pub const PRIME_MULTIPLIER: f64 = 1.00;
pub const VETERAN_MULTIPLIER: f64 = 0.95;

/// Prime bracket, inclusive on both ends.
const PRIME_START_AGE: f64 = 26.0;
const PRIME_END_AGE: f64 = 30.0;

/// Next-season per-game line scaled from the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionResult {
    pub multiplier: f64,
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub fga: f64,
}

/// Growth under 26, plateau from 26 through 30, decline after.
pub fn age_multiplier(age: f64) -> f64 {
    if age < PRIME_START_AGE {
        YOUNG_MULTIPLIER
    } else if age <= PRIME_END_AGE {
        PRIME_MULTIPLIER
    } else {
        VETERAN_MULTIPLIER
    }
}

/// Project `player` forward one season. `multiplier` overrides the age bracket.
pub fn project(player: &PlayerSeasonRecord, multiplier: Option<f64>) -> ProjectionResult {
    let multiplier = multiplier.unwrap_or_else(|| age_multiplier(player.age));
    ProjectionResult {
        multiplier,
        points: player.points * multiplier,
        assists: player.assists * multiplier,
        rebounds: player.rebounds * multiplier,
        fga: player.fga * multiplier,
    }
}

impl ProjectionResult {
    /// The multiplier prints in its shortest form: `1.0x`, `1.03x`, `0.95x`.
    pub fn caption(&self, age: f64) -> String {
        format!(
            "Based on Age {}, we project a {:?}x multiplier for next season.",
            age as u32, self.multiplier
        )
    }
}
