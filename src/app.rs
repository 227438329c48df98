use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Facet, cycle_facet};
use crate::state::messages::NetworkRequest;
use courtside_engine::filter::FilterState;
use courtside_engine::rank::conference_standings;
use courtside_engine::resolve::TeamDirectory;
use courtside_engine::season::{LoadOutcome, LoadTicket};
use courtside_engine::table::{TableModel, graded_fields};
use courtside_engine::{Population, RecordKind, StandingsEntry, TeamIdentity};
use log::{debug, info};

/// Smallest season the analytics provider publishes.
pub const FIRST_SEASON: u16 = 2008;
pub const MINUTES_STEP: f64 = 5.0;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Players,
    Teams,
    Standings,
    Help,
}

impl MenuItem {
    /// Record kind behind a stat table tab.
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            MenuItem::Players => Some(RecordKind::Player),
            MenuItem::Teams => Some(RecordKind::Team),
            MenuItem::Standings | MenuItem::Help => None,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, season: u16, filters: FilterState) -> Self {
        let app = Self { state: AppState::new(season, filters), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Everything needed on startup.
    pub fn initial_requests(&mut self) -> Vec<NetworkRequest> {
        let mut requests = vec![NetworkRequest::LoadTeams];
        requests.extend(self.season_requests());
        requests
    }

    /// Issue fresh tickets for both tables and ask for the season's standings.
    /// Older tickets still in flight become stale.
    pub fn season_requests(&mut self) -> Vec<NetworkRequest> {
        let season = self.state.season;
        let mut requests: Vec<NetworkRequest> = [RecordKind::Player, RecordKind::Team]
            .into_iter()
            .map(|kind| {
                let ticket = self.state.view_mut(kind).store.begin_load(season);
                NetworkRequest::LoadSeason { kind, ticket }
            })
            .collect();
        requests.push(NetworkRequest::LoadStandings { season });
        requests
    }

    pub fn change_season(&mut self, delta: i32) -> Vec<NetworkRequest> {
        let next = (i32::from(self.state.season) + delta).clamp(i32::from(FIRST_SEASON), i32::from(u16::MAX));
        let next = u16::try_from(next).unwrap_or(self.state.season);
        if next == self.state.season {
            return Vec::new();
        }
        info!("switching to season {next}");
        self.state.season = next;
        self.state.filters.season = next;
        self.state.standings_scroll = 0;
        self.season_requests()
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_season_loaded(
        &mut self,
        kind: RecordKind,
        ticket: LoadTicket,
        result: Result<Population, String>,
    ) -> LoadOutcome {
        let outcome = self.state.view_mut(kind).store.finish_load(ticket, result);
        match outcome {
            LoadOutcome::Applied => {
                self.state.last_error = None;
                let view = self.state.view_mut(kind);
                view.selected_row = 0;
                view.first_visible = 0;
            }
            LoadOutcome::Failed => {
                self.state.last_error = self.state.view(kind).store.last_error().map(str::to_owned);
            }
            LoadOutcome::Stale => {}
        }
        outcome
    }

    pub fn on_teams_loaded(&mut self, teams: Vec<TeamIdentity>) {
        debug!("team directory has {} teams", teams.len());
        self.state.directory = TeamDirectory::with_default_aliases(teams);
    }

    pub fn on_standings_loaded(&mut self, season: u16, entries: Vec<StandingsEntry>) {
        if season != self.state.season {
            debug!("dropping standings for {season}; showing {}", self.state.season);
            return;
        }
        self.state.standings = conference_standings(entries);
        self.state.standings_season = Some(season);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Derived table
    // -----------------------------------------------------------------------

    /// The table for `kind` under the current filters and sort. Recomputed
    /// only when one of its inputs changed.
    pub fn table(&mut self, kind: RecordKind) -> &TableModel {
        let state = &mut self.state;
        let view = match kind {
            RecordKind::Player => &mut state.players,
            RecordKind::Team => &mut state.teams,
        };
        view.cache.get_or_derive(
            view.store.generation(),
            view.store.population(),
            &state.filters,
            &view.sort,
            &state.directory,
            graded_fields(kind),
        )
    }

    pub fn row_count(&mut self, kind: RecordKind) -> usize {
        self.table(kind).rows.len()
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Table navigation
    // -----------------------------------------------------------------------

    pub fn move_row(&mut self, kind: RecordKind, delta: isize) {
        let count = self.row_count(kind);
        self.state.view_mut(kind).move_row(delta, count);
    }

    pub fn move_column(&mut self, kind: RecordKind, delta: isize) {
        self.state.view_mut(kind).move_column(delta);
    }

    pub fn sort_by_selected(&mut self, kind: RecordKind) {
        self.state.view_mut(kind).sort_by_selected();
    }

    pub fn clear_sort(&mut self, kind: RecordKind) {
        self.state.view_mut(kind).clear_sort();
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.state.editing_search = true;
    }

    pub fn stop_search(&mut self) {
        self.state.editing_search = false;
    }

    pub fn push_search(&mut self, c: char) {
        self.state.filters.search_text.push(c);
        self.after_filter_change();
    }

    pub fn pop_search(&mut self) {
        self.state.filters.search_text.pop();
        self.after_filter_change();
    }

    pub fn cycle_facet(&mut self, kind: RecordKind, facet: Facet) {
        let options = self.state.facet_options(kind, facet);
        let filters = &mut self.state.filters;
        let slot = match facet {
            Facet::Conference => &mut filters.conference,
            Facet::ClassYear => &mut filters.class_year,
        };
        *slot = cycle_facet(slot.as_deref(), &options);
        self.after_filter_change();
    }

    /// Narrow to the selected row's team, or clear the team facet if set.
    pub fn toggle_team_facet(&mut self, kind: RecordKind) {
        if self.state.filters.team.take().is_none() {
            let selected = self.state.view(kind).selected_row;
            let team = self.table(kind).rows.get(selected).map(|r| r.record.team().to_owned());
            self.state.filters.team = team;
        }
        self.after_filter_change();
    }

    pub fn adjust_min_minutes(&mut self, delta: f64) {
        let f = &mut self.state.filters;
        f.min_minutes_pct = (f.min_minutes_pct + delta).clamp(0.0, 100.0);
        self.after_filter_change();
    }

    pub fn adjust_min_games(&mut self, delta: i32) {
        let f = &mut self.state.filters;
        f.min_games_played = f.min_games_played.saturating_add_signed(delta);
        self.after_filter_change();
    }

    pub fn clear_filters(&mut self) {
        let f = &mut self.state.filters;
        f.conference = None;
        f.class_year = None;
        f.team = None;
        f.search_text.clear();
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        for kind in [RecordKind::Player, RecordKind::Team] {
            let count = self.row_count(kind);
            self.state.view_mut(kind).clamp(count);
        }
    }
}
