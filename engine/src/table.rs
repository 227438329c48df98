//! Row view model: the full derivation from a population to graded, ranked
//! rows, plus the window slice handed to the renderer.

use crate::filter::{self, FilterState};
use crate::grade::{self, CellGrade};
use crate::rank::{self, RankMap, SortState};
use crate::resolve::TeamDirectory;
use crate::thresholds::Thresholds;
use crate::{Population, RecordKind, StatRecord, TeamIdentity, fields};
use log::debug;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

/// Leading columns (rank, name, team) stay put during horizontal scroll.
pub const PINNED_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Global rank within the qualified population.
    pub rank: usize,
    pub record: Arc<StatRecord>,
    /// Schedule-provider identity, when the team label resolved.
    pub team: Option<TeamIdentity>,
    pub cell_bands: BTreeMap<String, CellGrade>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    pub kind: RecordKind,
    pub season: u16,
    pub rows: Vec<RowView>,
    pub thresholds: Thresholds,
    pub qualified_count: usize,
    /// Games minimum as configured.
    pub min_games_played: u32,
    pub effective_min_games: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowWindow<'a> {
    pub range: Range<usize>,
    pub pinned_columns: usize,
    pub rows: &'a [RowView],
}

/// Default graded columns for a record kind.
pub fn graded_fields(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Player => fields::PLAYER_GRADED,
        RecordKind::Team => fields::TEAM_GRADED,
    }
}

impl TableModel {
    /// Run the whole pipeline from scratch: qualify, profile, facet, sort,
    /// rank against the qualified set, resolve teams and grade every cell.
    pub fn derive(
        population: &Population,
        filters: &FilterState,
        sort: &SortState,
        teams: &TeamDirectory,
        graded: &[&str],
    ) -> Self {
        let records = &population.records;
        let effective_min_games = filter::effective_min_games(records, filters.min_games_played);
        let qualified = filter::qualified(records, filters);
        let thresholds = Thresholds::compute(qualified.iter().map(|r| &**r), graded);
        let displayed = rank::sorted(&filter::displayed(&qualified, filters, teams), sort);
        let ranks = RankMap::compute(&qualified, sort);

        let rows = displayed
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let team = teams.resolve(record.team()).cloned();
                let cell_bands = graded
                    .iter()
                    .map(|&field| {
                        let cell = grade::grade(population.kind, field, &**record, &thresholds);
                        (field.to_owned(), cell)
                    })
                    .collect();
                RowView { rank: ranks.rank_or(record, i), record: Arc::clone(record), team, cell_bands }
            })
            .collect::<Vec<_>>();

        debug!(
            "derived {} table: {} records, {} qualified, {} displayed",
            population.kind.label(),
            records.len(),
            qualified.len(),
            rows.len()
        );

        Self {
            kind: population.kind,
            season: population.season,
            rows,
            thresholds,
            qualified_count: qualified.len(),
            min_games_played: filters.min_games_played,
            effective_min_games,
        }
    }

    /// A games minimum was configured but early-season relaxation dropped it.
    pub fn games_minimum_waived(&self) -> bool {
        self.min_games_played > 0 && self.effective_min_games == 0
    }

    /// Rows a virtualized renderer should materialize: the visible range plus
    /// `overscan` rows on either side, clamped to the table.
    pub fn window(&self, first_visible: usize, visible_count: usize, overscan: usize) -> RowWindow<'_> {
        let len = self.rows.len();
        let start = first_visible.saturating_sub(overscan).min(len);
        let end = first_visible
            .saturating_add(visible_count)
            .saturating_add(overscan)
            .min(len)
            .max(start);
        RowWindow { range: start..end, pinned_columns: PINNED_COLUMNS, rows: &self.rows[start..end] }
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// Everything a derivation depends on. Population identity is the store
/// generation, since populations are replaced wholesale; the team directory
/// is identified by its revision.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationKey {
    pub generation: u64,
    pub kind: RecordKind,
    pub filters: FilterState,
    pub sort: SortState,
    pub graded: Vec<String>,
    pub directory_revision: u64,
}

/// Single-entry memo over `TableModel::derive`. Any input change recomputes
/// the whole model; nothing is patched incrementally.
#[derive(Debug, Default)]
pub struct TableCache {
    last: Option<(DerivationKey, TableModel)>,
    misses: u64,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_derive(
        &mut self,
        generation: u64,
        population: &Population,
        filters: &FilterState,
        sort: &SortState,
        teams: &TeamDirectory,
        graded: &[&str],
    ) -> &TableModel {
        let key = DerivationKey {
            generation,
            kind: population.kind,
            filters: filters.clone(),
            sort: sort.clone(),
            graded: graded.iter().map(|f| (*f).to_owned()).collect(),
            directory_revision: teams.revision(),
        };
        match self.last.take() {
            Some((previous, model)) if previous == key => &self.last.insert((previous, model)).1,
            _ => {
                self.misses += 1;
                let model = TableModel::derive(population, filters, sort, teams, graded);
                &self.last.insert((key, model)).1
            }
        }
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
