use crate::state::network::LoadingState;
use courtside_engine::season::LoadTicket;
use courtside_engine::{Population, RecordKind, StandingsEntry, TeamIdentity};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Fetch one season of stat rows. The ticket comes from the kind's `SeasonStore`.
    LoadSeason { kind: RecordKind, ticket: LoadTicket },
    LoadTeams,
    LoadStandings { season: u16 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Carries failures too, so the store can retire the ticket.
    SeasonLoaded { kind: RecordKind, ticket: LoadTicket, result: Result<Population, String> },
    TeamsLoaded { teams: Vec<TeamIdentity> },
    StandingsLoaded { season: u16, entries: Vec<StandingsEntry> },
    Error { message: String },
}

impl NetworkResponse {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            NetworkResponse::Error { .. } | NetworkResponse::SeasonLoaded { result: Err(_), .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
