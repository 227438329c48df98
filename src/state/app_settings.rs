use courtside_engine::client::Endpoints;
use log::LevelFilter;
use std::path::PathBuf;

pub const PLAYERS_JSON_VAR: &str = "COURTSIDE_PLAYERS_JSON";
pub const TEAM_STATS_JSON_VAR: &str = "COURTSIDE_TEAM_STATS_JSON";
pub const TEAMS_JSON_VAR: &str = "COURTSIDE_TEAMS_JSON";
pub const ANALYTICS_URL_VAR: &str = "COURTSIDE_ANALYTICS_URL";
pub const ESPN_URL_VAR: &str = "COURTSIDE_ESPN_URL";
pub const LOG_VAR: &str = "COURTSIDE_LOG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub endpoints: Endpoints,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let mut endpoints = Endpoints::default();
        if let Some(url) = var(ANALYTICS_URL_VAR) {
            endpoints.analytics_base = url.trim_end_matches('/').to_owned();
        }
        // One override for both ESPN document roots; mocks serve them from one host.
        if let Some(url) = var(ESPN_URL_VAR) {
            let url = url.trim_end_matches('/').to_owned();
            endpoints.espn_site_base = url.clone();
            endpoints.espn_base = url;
        }
        endpoints.players_snapshot = var(PLAYERS_JSON_VAR).map(PathBuf::from);
        endpoints.team_stats_snapshot = var(TEAM_STATS_JSON_VAR).map(PathBuf::from);
        endpoints.teams_snapshot = var(TEAMS_JSON_VAR).map(PathBuf::from);

        Self {
            full_screen: false,
            log_level: var(LOG_VAR).and_then(|level| level.parse().ok()),
            endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        AppSettings::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_public_providers() {
        let s = settings(&[]);
        assert_eq!(s.endpoints.analytics_base, courtside_engine::client::ANALYTICS_BASE);
        assert!(s.endpoints.players_snapshot.is_none());
        assert!(s.log_level.is_none());
    }

    #[test]
    fn env_overrides_endpoints_and_snapshots() {
        let s = settings(&[
            (ANALYTICS_URL_VAR, "http://localhost:9000/"),
            (ESPN_URL_VAR, "http://localhost:9001"),
            (PLAYERS_JSON_VAR, "/tmp/players.json"),
            (TEAMS_JSON_VAR, "  "),
            (LOG_VAR, "debug"),
        ]);
        assert_eq!(s.endpoints.analytics_base, "http://localhost:9000");
        assert_eq!(s.endpoints.espn_site_base, "http://localhost:9001");
        assert_eq!(s.endpoints.espn_base, "http://localhost:9001");
        assert_eq!(s.endpoints.players_snapshot, Some(PathBuf::from("/tmp/players.json")));
        assert!(s.endpoints.teams_snapshot.is_none());
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn unknown_log_level_is_ignored() {
        assert!(settings(&[(LOG_VAR, "chatty")]).log_level.is_none());
    }
}
