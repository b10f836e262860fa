use crate::state::cache::TtlCache;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info, warn};
use nba_stats_api::client::NbaStatsApi;
use nba_stats_api::{CareerRecord, SeasonTable};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serves season and career requests one at a time, from cache when fresh.
pub struct NetworkWorker {
    client: NbaStatsApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
    seasons: TtlCache<String, SeasonTable>,
    careers: TtlCache<u32, CareerRecord>,
}

impl NetworkWorker {
    pub fn new(
        client: NbaStatsApi,
        cache_ttl: Duration,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
            seasons: TtlCache::new(cache_ttl),
            careers: TtlCache::new(cache_ttl),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let response = match self.cached_response(&request) {
                Some(response) => response,
                None => self.fetch(request).await,
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    fn cached_response(&self, request: &NetworkRequest) -> Option<NetworkResponse> {
        match request {
            NetworkRequest::LoadSeason { season } => {
                let table = self.seasons.get(season)?;
                debug!("season {season} served from cache");
                Some(NetworkResponse::SeasonLoaded { table: table.clone() })
            }
            NetworkRequest::LoadCareer { player_id } => {
                let career = self.careers.get(player_id)?;
                debug!("career {player_id} served from cache");
                Some(NetworkResponse::CareerLoaded { career: career.clone() })
            }
        }
    }

    async fn fetch(&mut self, request: NetworkRequest) -> NetworkResponse {
        let purged = self.seasons.purge_expired() + self.careers.purge_expired();
        if purged > 0 {
            debug!("dropped {purged} expired cache entries");
        }

        self.start_loading_animation().await;
        let response = match request {
            NetworkRequest::LoadSeason { season } => self.handle_load_season(season).await,
            NetworkRequest::LoadCareer { player_id } => self.handle_load_career(player_id).await,
        };
        let is_ok = !matches!(
            response,
            NetworkResponse::SeasonFailed { .. } | NetworkResponse::CareerFailed { .. }
        );
        debug!("network request complete");
        self.stop_loading_animation(is_ok).await;
        response
    }

    async fn handle_load_season(&mut self, season: String) -> NetworkResponse {
        debug!("loading season {season}");
        match self.client.fetch_season_table(&season).await {
            Ok(table) => {
                info!("season {season}: {} players", table.len());
                self.seasons.insert(season, table.clone());
                debug!(
                    "{} seasons cached for {}s",
                    self.seasons.len(),
                    self.seasons.ttl().as_secs()
                );
                NetworkResponse::SeasonLoaded { table }
            }
            Err(e) => {
                warn!("season {season} failed: {e}");
                NetworkResponse::SeasonFailed { season, message: e.to_string() }
            }
        }
    }

    async fn handle_load_career(&mut self, player_id: u32) -> NetworkResponse {
        debug!("loading career for player {player_id}");
        match self.client.fetch_career(player_id).await {
            Ok(career) => {
                self.careers.insert(player_id, career.clone());
                NetworkResponse::CareerLoaded { career }
            }
            Err(e) => {
                warn!("career {player_id} failed: {e}");
                NetworkResponse::CareerFailed { player_id, message: e.to_string() }
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
