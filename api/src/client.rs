use crate::stats::{ResultSet, Row, StatsResponse};
use crate::{CareerRecord, CareerSeason, PlayerSeasonRecord, SeasonTable, free_throw_rate};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const STATS_NBA_BASE: &str = "https://stats.nba.com/stats";

/// stats.nba.com is slow under load; anything shorter times out regularly.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SEASON_TYPE: &str = "Regular Season";

/// Client for the public stats.nba.com endpoints.
#[derive(Debug, Clone)]
pub struct NbaStatsApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NbaStatsApi {
    fn default() -> Self {
        Self::with_base_url(STATS_NBA_BASE)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The three `leaguedashplayerstats` views joined into one season table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerStatsView {
    PerGame,
    Per36,
    Advanced,
}

impl PlayerStatsView {
    fn measure_type(self) -> &'static str {
        match self {
            PlayerStatsView::PerGame | PlayerStatsView::Per36 => "Base",
            PlayerStatsView::Advanced => "Advanced",
        }
    }

    fn per_mode(self) -> &'static str {
        match self {
            PlayerStatsView::PerGame | PlayerStatsView::Advanced => "PerGame",
            PlayerStatsView::Per36 => "Per36",
        }
    }
}

impl NbaStatsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(
                    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) courtside/0.1",
                )
                .default_headers(default_headers())
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch per-game, per-36 and advanced player stats for `season`
    /// (`"2023-24"`) and join them on player id.
    ///
    /// Players missing from either the per-36 or the advanced table are
    /// dropped, so every returned record is complete.
    pub async fn fetch_season_table(&self, season: &str) -> ApiResult<SeasonTable> {
        let per_game = self.fetch_player_stats(season, PlayerStatsView::PerGame).await?;
        let per36 = self.fetch_player_stats(season, PlayerStatsView::Per36).await?;
        let advanced = self.fetch_player_stats(season, PlayerStatsView::Advanced).await?;

        Ok(SeasonTable {
            season: season.to_owned(),
            players: join_season_tables(&per_game, &per36, &advanced),
        })
    }

    /// Fetch a player's regular season career totals, one row per season
    /// (and per team, for seasons split by a trade).
    pub async fn fetch_career(&self, player_id: u32) -> ApiResult<CareerRecord> {
        let params = [
            ("LeagueID", "00".to_owned()),
            ("PerMode", "Totals".to_owned()),
            ("PlayerID", player_id.to_string()),
        ];
        let raw: StatsResponse = self.get("playercareerstats", &params).await?;
        let set = raw
            .named("SeasonTotalsRegularSeason")
            .or_else(|| raw.primary())
            .ok_or_else(|| ApiError::NotFound(format!("no career table for player {player_id}")))?;
        Ok(map_career(player_id, set))
    }

    async fn fetch_player_stats(&self, season: &str, view: PlayerStatsView) -> ApiResult<ResultSet> {
        let params = player_stats_params(season, view);
        let raw: StatsResponse = self.get("leaguedashplayerstats", &params).await?;
        raw.result_sets
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("no player stats returned for {season}")))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }
}

/// stats.nba.com rejects or stalls requests that don't look like they came
/// from nba.com.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

/// The endpoint insists on every filter being present, even when unused.
fn player_stats_params(season: &str, view: PlayerStatsView) -> Vec<(&'static str, String)> {
    let fixed = [
        ("College", ""),
        ("Conference", ""),
        ("Country", ""),
        ("DateFrom", ""),
        ("DateTo", ""),
        ("Division", ""),
        ("DraftPick", ""),
        ("DraftYear", ""),
        ("GameScope", ""),
        ("GameSegment", ""),
        ("Height", ""),
        ("LastNGames", "0"),
        ("LeagueID", "00"),
        ("Location", ""),
        ("Month", "0"),
        ("OpponentTeamID", "0"),
        ("Outcome", ""),
        ("PORound", "0"),
        ("PaceAdjust", "N"),
        ("Period", "0"),
        ("PlayerExperience", ""),
        ("PlayerPosition", ""),
        ("PlusMinus", "N"),
        ("Rank", "N"),
        ("SeasonSegment", ""),
        ("ShotClockRange", ""),
        ("StarterBench", ""),
        ("TeamID", "0"),
        ("TwoWay", "0"),
        ("VsConference", ""),
        ("VsDivision", ""),
        ("Weight", ""),
    ];

    let mut params: Vec<(&'static str, String)> = fixed
        .iter()
        .map(|(k, v)| (*k, (*v).to_owned()))
        .collect();
    params.push(("MeasureType", view.measure_type().to_owned()));
    params.push(("PerMode", view.per_mode().to_owned()));
    params.push(("Season", season.to_owned()));
    params.push(("SeasonType", SEASON_TYPE.to_owned()));
    params
}

// ---------------------------------------------------------------------------
// Mapping: stats.nba.com result sets → clean domain types
// ---------------------------------------------------------------------------

/// Inner join of the three player tables on `PLAYER_ID`, keeping the
/// per-game table's row order, then derive the free throw rate.
fn join_season_tables(
    per_game: &ResultSet,
    per36: &ResultSet,
    advanced: &ResultSet,
) -> Vec<PlayerSeasonRecord> {
    let per36_by_id: HashMap<u32, Row<'_>> =
        per36.rows().map(|row| (row.u32("PLAYER_ID"), row)).collect();
    let advanced_by_id: HashMap<u32, Row<'_>> =
        advanced.rows().map(|row| (row.u32("PLAYER_ID"), row)).collect();

    per_game
        .rows()
        .filter_map(|row| {
            let player_id = row.u32("PLAYER_ID");
            let p36 = per36_by_id.get(&player_id)?;
            let adv = advanced_by_id.get(&player_id)?;
            Some(map_player(row, p36, adv))
        })
        .collect()
}

fn map_player(row: Row<'_>, per36: &Row<'_>, advanced: &Row<'_>) -> PlayerSeasonRecord {
    let fga = row.f64("FGA");
    let fta = row.f64("FTA");
    PlayerSeasonRecord {
        player_id: row.u32("PLAYER_ID"),
        player_name: row.string("PLAYER_NAME"),
        team_id: row.u32("TEAM_ID"),
        team_abbreviation: row.string("TEAM_ABBREVIATION"),
        age: row.f64("AGE"),
        games_played: row.u32("GP"),
        minutes: row.f64("MIN"),
        points: row.f64("PTS"),
        assists: row.f64("AST"),
        rebounds: row.f64("REB"),
        fgm: row.f64("FGM"),
        fga,
        fta,
        steals: row.f64("STL"),
        blocks: row.f64("BLK"),
        fg3_pct: row.f64("FG3_PCT"),
        points_per36: per36.f64("PTS"),
        steals_per36: per36.f64("STL"),
        blocks_per36: per36.f64("BLK"),
        ts_pct: advanced.f64("TS_PCT"),
        efg_pct: advanced.f64("EFG_PCT"),
        ast_pct: advanced.f64("AST_PCT"),
        oreb_pct: advanced.f64("OREB_PCT"),
        dreb_pct: advanced.f64("DREB_PCT"),
        ft_rate: free_throw_rate(fta, fga),
    }
}

fn map_career(player_id: u32, set: &ResultSet) -> CareerRecord {
    let seasons = set
        .rows()
        .map(|row| {
            CareerSeason::from_totals(
                row.string("SEASON_ID"),
                row.string("TEAM_ABBREVIATION"),
                row.f64("PLAYER_AGE"),
                row.u32("GP"),
                row.f64("PTS"),
                row.f64("AST"),
                row.f64("REB"),
            )
        })
        .collect();
    CareerRecord { player_id, seasons }
}
