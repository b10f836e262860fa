use crate::analytics::season_view::{DEFAULT_MIN_GAMES, MAX_MIN_GAMES};
use crate::analytics::trade::{DEFAULT_SHARE_PCT, MAX_SHARE_PCT, TradeModel};
use crate::state::cache::DEFAULT_TTL;
use log::{LevelFilter, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const CONFIG_DIR: &str = "courtside";
const CONFIG_FILE: &str = "settings.json";

pub const DEFAULT_SEASON: &str = "2023-24";
pub const DEFAULT_PLAYER: &str = "Joel Embiid";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Season shown on startup, if it is in the season list.
    pub default_season: String,
    /// Player selected whenever the current selection falls out of the filter.
    pub default_player: Option<String>,
    pub min_games: u8,
    pub share_pct: u8,
    pub cache_ttl: Duration,
    /// Override for the stats service base URL.
    pub stats_base_url: Option<String>,
    pub trade_model: TradeModel,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            default_season: DEFAULT_SEASON.to_string(),
            default_player: Some(DEFAULT_PLAYER.to_string()),
            min_games: DEFAULT_MIN_GAMES,
            share_pct: DEFAULT_SHARE_PCT,
            cache_ttl: DEFAULT_TTL,
            stats_base_url: None,
            trade_model: TradeModel::default(),
        }
    }
}

/// On-disk shape of `settings.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    full_screen: Option<bool>,
    log_level: Option<String>,
    default_season: Option<String>,
    default_player: Option<String>,
    min_games: Option<u8>,
    share_pct: Option<u8>,
    cache_ttl_secs: Option<u64>,
    stats_base_url: Option<String>,
    trade_model: Option<TradeModel>,
}

impl AppSettings {
    /// Defaults, then `settings.json`, then `COURTSIDE_*` environment variables.
    pub fn load() -> Self {
        let mut settings = Self::default();

        if let Some(path) = config_path()
            && let Ok(raw) = std::fs::read_to_string(&path)
        {
            match settings.apply_file(&raw) {
                Ok(()) => {}
                Err(e) => warn!("ignoring {}: {e}", path.display()),
            }
        }

        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// The configured level, else errors only.
    pub fn effective_log_level(&self) -> LevelFilter {
        self.log_level.unwrap_or(DEFAULT_LOG_LEVEL)
    }

    fn apply_file(&mut self, raw: &str) -> Result<(), serde_json::Error> {
        let file: SettingsFile = serde_json::from_str(raw)?;

        if let Some(full_screen) = file.full_screen {
            self.full_screen = full_screen;
        }
        if let Some(level) = file.log_level.as_deref().and_then(parse_level) {
            self.log_level = Some(level);
        }
        if let Some(season) = file.default_season {
            self.default_season = season;
        }
        if let Some(player) = file.default_player {
            self.default_player = Some(player).filter(|p| !p.trim().is_empty());
        }
        if let Some(min_games) = file.min_games {
            self.min_games = min_games.min(MAX_MIN_GAMES);
        }
        if let Some(share_pct) = file.share_pct {
            self.share_pct = share_pct.min(MAX_SHARE_PCT);
        }
        if let Some(secs) = file.cache_ttl_secs {
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(url) = file.stats_base_url {
            self.stats_base_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(model) = file.trade_model {
            self.trade_model = model;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(season) = var("COURTSIDE_SEASON").filter(|s| !s.trim().is_empty()) {
            self.default_season = season.trim().to_string();
        }
        if let Some(min_games) = var("COURTSIDE_MIN_GAMES").and_then(|v| v.trim().parse::<u8>().ok()) {
            self.min_games = min_games.min(MAX_MIN_GAMES);
        }
        if let Some(url) = var("COURTSIDE_STATS_URL").filter(|u| !u.trim().is_empty()) {
            self.stats_base_url = Some(url.trim().to_string());
        }
        if let Some(level) = var("COURTSIDE_LOG").as_deref().and_then(parse_level) {
            self.log_level = Some(level);
        }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(raw.trim()).ok()
}

fn config_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CONFIG_DIR).join(CONFIG_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}
