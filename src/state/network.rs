use crate::state::messages::{NetworkRequest, NetworkResponse};
use courtside_engine::RecordKind;
use courtside_engine::client::{ApiError, Endpoints, StatsClient};
use courtside_engine::season::LoadTicket;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serves requests one at a time, in arrival order. A season load that was
/// superseded while queued still runs; the store discards its result.
pub struct NetworkWorker {
    client: StatsClient,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        endpoints: Endpoints,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: StatsClient::with_endpoints(endpoints),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSeason { kind, ticket } => self.handle_load_season(kind, ticket).await,
                NetworkRequest::LoadTeams => self.handle_load_teams().await,
                NetworkRequest::LoadStandings { season } => self.handle_load_standings(season).await,
            };

            debug!("network request complete");
            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });
            self.stop_loading_animation(!response.is_failure()).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_season(
        &self,
        kind: RecordKind,
        ticket: LoadTicket,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading {} for season {} (gen {})", kind.label(), ticket.season, ticket.generation);
        let result = self
            .client
            .fetch_season(ticket.season, kind)
            .await
            .map_err(|e| e.to_string());
        Ok(NetworkResponse::SeasonLoaded { kind, ticket, result })
    }

    async fn handle_load_teams(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading team directory");
        let teams = self.client.fetch_teams().await?;
        Ok(NetworkResponse::TeamsLoaded { teams })
    }

    async fn handle_load_standings(&self, season: u16) -> Result<NetworkResponse, ApiError> {
        debug!("loading standings for {season}");
        let entries = self.client.fetch_standings(season).await?;
        Ok(NetworkResponse::StandingsLoaded { season, entries })
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
