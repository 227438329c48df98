use crate::Population;
use chrono::{DateTime, Datelike, Utc};
use log::{debug, warn};

/// College seasons are named for the calendar year they end in. From
/// November on, the upcoming season is the current one.
pub fn current_season(now: DateTime<Utc>) -> u16 {
    let year = if now.month() >= 11 { now.year() + 1 } else { now.year() };
    u16::try_from(year).unwrap_or(u16::MAX)
}

/// Identifies one season load. Only the most recently issued ticket may
/// replace the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub season: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued after this one.
    Stale,
    /// The fetch failed; the previous population stays.
    Failed,
}

/// Holds the population currently on screen and tracks in-flight loads.
///
/// While a load is pending the previous population keeps serving reads and
/// `is_loading` is raised; the swap happens all at once on `finish_load`.
#[derive(Debug, Default)]
pub struct SeasonStore {
    population: Population,
    /// Generation of the population currently held. 0 = nothing loaded yet.
    applied: u64,
    issued: u64,
    pending: Option<LoadTicket>,
    last_error: Option<String>,
}

impl SeasonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, season: u16) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket { generation: self.issued, season };
        if let Some(previous) = self.pending.replace(ticket) {
            debug!(
                "season {} load (gen {}) superseded by season {season} (gen {})",
                previous.season, previous.generation, ticket.generation
            );
        }
        ticket
    }

    pub fn finish_load<E: std::fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Population, E>,
    ) -> LoadOutcome {
        if self.pending != Some(ticket) {
            warn!(
                "ignoring stale season {} response (gen {}, latest gen {})",
                ticket.season, ticket.generation, self.issued
            );
            return LoadOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(population) => {
                debug!(
                    "applied season {} ({} {}) gen {}",
                    ticket.season,
                    population.len(),
                    population.kind.label(),
                    ticket.generation
                );
                self.population = population;
                self.applied = ticket.generation;
                self.last_error = None;
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!("season {} load failed: {e}", ticket.season);
                self.last_error = Some(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Changes every time a new population is applied; use it as the
    /// population identity in memo keys.
    pub fn generation(&self) -> u64 {
        self.applied
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_season(&self) -> Option<u16> {
        self.pending.map(|t| t.season)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
