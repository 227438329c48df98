use crate::app::MenuItem;
use crate::ui::columns::stat_columns;
use courtside_engine::fields::{BARTHAG, BPM};
use courtside_engine::filter::FilterState;
use courtside_engine::rank::{Direction, SortState};
use courtside_engine::resolve::TeamDirectory;
use courtside_engine::season::SeasonStore;
use courtside_engine::table::TableCache;
use courtside_engine::{RecordKind, StandingsEntry};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Stat table state (one per record kind)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TableView {
    pub kind: RecordKind,
    pub store: SeasonStore,
    pub cache: TableCache,
    pub sort: SortState,
    /// Index into the displayed rows.
    pub selected_row: usize,
    /// First row drawn; kept so the selection stays on screen.
    pub first_visible: usize,
    /// Index into `stat_columns(kind)`; the sort key under the cursor.
    pub selected_column: usize,
    /// First scrollable column drawn after the pinned ones.
    pub first_column: usize,
}

impl TableView {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            store: SeasonStore::new(),
            cache: TableCache::new(),
            sort: default_sort(kind),
            selected_row: 0,
            first_visible: 0,
            selected_column: 0,
            first_column: 0,
        }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        stat_columns(self.kind)
    }

    pub fn selected_field(&self) -> Option<&'static str> {
        self.columns().get(self.selected_column).copied()
    }

    pub fn move_row(&mut self, delta: isize, row_count: usize) {
        self.selected_row = step(self.selected_row, delta, row_count);
    }

    pub fn move_column(&mut self, delta: isize) {
        let count = self.columns().len();
        self.selected_column = step(self.selected_column, delta, count);
        if self.selected_column < self.first_column {
            self.first_column = self.selected_column;
        }
    }

    /// Sort by the column under the cursor. Choosing the active column again
    /// flips the direction.
    pub fn sort_by_selected(&mut self) {
        let Some(field) = self.selected_field() else {
            return;
        };
        self.sort = if self.sort.field.as_deref() == Some(field) {
            let direction = match self.sort.direction {
                Direction::Asc => Direction::Desc,
                Direction::Desc => Direction::Asc,
            };
            SortState::by(field, direction)
        } else {
            SortState::by(field, Direction::Desc)
        };
        self.selected_row = 0;
    }

    pub fn clear_sort(&mut self) {
        self.sort = SortState::unsorted();
        self.selected_row = 0;
    }

    /// Row filters changed under us; keep the cursor inside the table.
    pub fn clamp(&mut self, row_count: usize) {
        self.selected_row = self.selected_row.min(row_count.saturating_sub(1));
        self.first_visible = self.first_visible.min(self.selected_row);
    }
}

pub fn default_sort(kind: RecordKind) -> SortState {
    match kind {
        RecordKind::Player => SortState::by(BPM, Direction::Desc),
        RecordKind::Team => SortState::by(BARTHAG, Direction::Desc),
    }
}

fn step(current: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(count - 1)
}

/// New first row so that `selected` sits inside a viewport of `height` rows.
pub fn scroll_into_view(selected: usize, first_visible: usize, height: usize) -> usize {
    if height == 0 {
        return selected;
    }
    if selected < first_visible {
        selected
    } else if selected >= first_visible + height {
        selected + 1 - height
    } else {
        first_visible
    }
}

/// Next value of a facet: none → first option → ... → last option → none.
pub fn cycle_facet(current: Option<&str>, options: &BTreeSet<String>) -> Option<String> {
    match current {
        None => options.iter().next().cloned(),
        Some(value) => options
            .range::<str, _>((std::ops::Bound::Excluded(value), std::ops::Bound::Unbounded))
            .next()
            .cloned(),
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub season: u16,
    pub filters: FilterState,
    pub players: TableView,
    pub teams: TableView,
    pub directory: TeamDirectory,
    pub standings: BTreeMap<String, Vec<StandingsEntry>>,
    pub standings_season: Option<u16>,
    pub standings_scroll: u16,
    /// Keystrokes go to the search box while set.
    pub editing_search: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(season: u16, filters: FilterState) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            season,
            filters: FilterState { season, ..filters },
            players: TableView::new(RecordKind::Player),
            teams: TableView::new(RecordKind::Team),
            directory: TeamDirectory::with_default_aliases(Vec::new()),
            standings: BTreeMap::new(),
            standings_season: None,
            standings_scroll: 0,
            editing_search: false,
            show_logs: false,
            last_error: None,
        }
    }

    pub fn view(&self, kind: RecordKind) -> &TableView {
        match kind {
            RecordKind::Player => &self.players,
            RecordKind::Team => &self.teams,
        }
    }

    pub fn view_mut(&mut self, kind: RecordKind) -> &mut TableView {
        match kind {
            RecordKind::Player => &mut self.players,
            RecordKind::Team => &mut self.teams,
        }
    }

    /// Distinct values of a facet in the loaded population.
    pub fn facet_options(&self, kind: RecordKind, facet: Facet) -> BTreeSet<String> {
        self.view(kind)
            .store
            .population()
            .records
            .iter()
            .filter_map(|r| match facet {
                Facet::Conference => Some(r.conference()),
                Facet::ClassYear => r.class_year(),
            })
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Conference,
    ClassYear,
}
