use crate::analytics::{decode_player_rows, decode_team_rows};
use crate::espn::{StandingsResponse, TeamsResponse, map_standings, map_teams};
use crate::{Population, RecordKind, StandingsEntry, TeamIdentity};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

pub const ANALYTICS_BASE: &str = "https://barttorvik.com";
pub const ESPN_SITE_V2: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/mens-college-basketball";
pub const ESPN_V2: &str = "https://site.api.espn.com/apis/v2/sports/basketball/mens-college-basketball";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("could not read {path}: {source}")]
    Snapshot { path: String, source: std::io::Error },
    #[error("invalid json at {path}: {source}")]
    SnapshotJson { path: String, source: serde_json::Error },
}

/// Where each feed comes from. Snapshot paths win over the network.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub analytics_base: String,
    pub espn_site_base: String,
    pub espn_base: String,
    pub players_snapshot: Option<PathBuf>,
    pub team_stats_snapshot: Option<PathBuf>,
    pub teams_snapshot: Option<PathBuf>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            analytics_base: ANALYTICS_BASE.to_owned(),
            espn_site_base: ESPN_SITE_V2.to_owned(),
            espn_base: ESPN_V2.to_owned(),
            players_snapshot: None,
            team_stats_snapshot: None,
            teams_snapshot: None,
        }
    }
}

/// Thin adapter over both providers. No retries: a failed fetch surfaces as
/// an error and the caller keeps whatever it was showing.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    timeout: Duration,
    endpoints: Endpoints,
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::with_endpoints(Endpoints::default())
    }
}

impl StatsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            endpoints,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch one season of positional rows and decode them.
    pub async fn fetch_season(&self, season: u16, kind: RecordKind) -> ApiResult<Population> {
        let records = match kind {
            RecordKind::Player => {
                let url = format!("{}/getadvstats.php?year={season}&json=1", self.endpoints.analytics_base);
                let rows: Vec<Value> = self.load(self.endpoints.players_snapshot.as_ref(), &url).await?;
                decode_player_rows(&rows, season)
            }
            RecordKind::Team => {
                let url = format!("{}/{season}_team_results.json", self.endpoints.analytics_base);
                let rows: Vec<Value> = self.load(self.endpoints.team_stats_snapshot.as_ref(), &url).await?;
                decode_team_rows(&rows, season)
            }
        };
        debug!("decoded {} {} for {season}", records.len(), kind.label());
        Ok(Population::new(season, kind, records))
    }

    /// Every Division I team the schedule provider knows about.
    pub async fn fetch_teams(&self) -> ApiResult<Vec<TeamIdentity>> {
        let url = format!("{}/teams?limit=500", self.endpoints.espn_site_base);
        let raw: TeamsResponse = self.load(self.endpoints.teams_snapshot.as_ref(), &url).await?;
        Ok(map_teams(raw))
    }

    pub async fn fetch_standings(&self, season: u16) -> ApiResult<Vec<StandingsEntry>> {
        let url = format!("{}/standings?season={season}", self.endpoints.espn_base);
        let raw: StandingsResponse = self.get(&url).await?;
        Ok(map_standings(raw))
    }

    async fn load<T: Default + DeserializeOwned>(&self, snapshot: Option<&PathBuf>, url: &str) -> ApiResult<T> {
        match snapshot {
            Some(path) => read_snapshot(path),
            None => self.get(url).await,
        }
    }

    async fn get<T: Default + DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    debug!("{url} answered {:?}; treating as empty", e.status());
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

fn read_snapshot<T: DeserializeOwned>(path: &PathBuf) -> ApiResult<T> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|source| ApiError::Snapshot { path: display.clone(), source })?;
    serde_json::from_str(&content).map_err(|source| ApiError::SnapshotJson { path: display, source })
}
