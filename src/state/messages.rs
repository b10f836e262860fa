use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nba_stats_api::{CareerRecord, SeasonTable};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadSeason { season: String },
    LoadCareer { player_id: u32 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SeasonLoaded { table: SeasonTable },
    /// The season could not be fetched; the app shows it empty.
    SeasonFailed { season: String, message: String },
    CareerLoaded { career: CareerRecord },
    CareerFailed { player_id: u32, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
