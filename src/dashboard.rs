//! The page controller. Owns the full snapshot, the filter selection and the
//! pagination state, and recomputes every derived set with explicit calls
//! after each transition; nothing observes anything.
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::facets::{derive_facets, Facets};
use crate::filter::apply_filters;
use crate::model::{AdRecord, FilterSelection};
use crate::pager::Pager;
use crate::store::{fetch_all_records, RecordStore};

/// Fetch lifecycle. `request_more` is only honored in `Ready`, which is what
/// serializes page advances against an in-flight fetch: the transition out of
/// `Ready` happens before the fetch is awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct Dashboard {
    snapshot: Vec<AdRecord>,
    facets: Facets,
    selection: FilterSelection,
    working_set: Vec<AdRecord>,
    pager: Pager,
    phase: Phase,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            snapshot: Vec::new(),
            facets: Facets::default(),
            selection: FilterSelection::default(),
            working_set: Vec::new(),
            pager: Pager::new(),
            phase: Phase::Loading,
        }
    }

    /// Fetch the full snapshot and rebuild all derived state. A retry after a
    /// failure re-runs the whole sequence from the count query; a failed
    /// attempt keeps no partial pages.
    #[instrument(skip_all)]
    pub async fn load(&mut self, store: &dyn RecordStore) {
        self.phase = Phase::Loading;
        match fetch_all_records(store).await {
            Ok(snapshot) => {
                info!(records = snapshot.len(), "snapshot loaded");
                self.snapshot = snapshot;
                self.facets = derive_facets(&self.snapshot);
                self.recompute_working_set();
                self.phase = Phase::Ready;
            }
            Err(err) => {
                warn!(?err, "snapshot load failed");
                self.snapshot.clear();
                self.facets = Facets::default();
                self.recompute_working_set();
                self.phase = Phase::Failed(err.to_string());
            }
        }
    }

    fn recompute_working_set(&mut self) {
        self.working_set = apply_filters(&self.snapshot, &self.selection);
        self.pager.reset();
    }

    pub fn set_sponsor(&mut self, sponsor: Option<String>) {
        self.selection.sponsor = sponsor.filter(|s| !s.is_empty());
        self.recompute_working_set();
    }

    pub fn set_newsletter(&mut self, newsletter: Option<String>) {
        self.selection.newsletter = newsletter.filter(|s| !s.is_empty());
        self.recompute_working_set();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.selection.start_date = date;
        self.recompute_working_set();
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.selection.end_date = date;
        self.recompute_working_set();
    }

    /// One-action reset of all four constraints.
    pub fn reset_filters(&mut self) {
        self.selection.reset();
        self.recompute_working_set();
    }

    /// The "load more" signal from the presentation layer's visibility
    /// sentinel. Ignored unless the controller is idle and rows remain.
    /// Returns whether another page was revealed.
    pub fn request_more(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        if !self.pager.has_more(self.working_set.len()) {
            return false;
        }
        self.pager.advance();
        true
    }

    /// The currently visible prefix of the filtered working set.
    pub fn visible(&self) -> &[AdRecord] {
        let n = self.pager.visible_count(self.working_set.len());
        &self.working_set[..n]
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.working_set.len())
    }

    /// Size of the full snapshot, independent of filters.
    pub fn total_records(&self) -> usize {
        self.snapshot.len()
    }

    /// Size of the filtered working set.
    pub fn filtered_len(&self) -> usize {
        self.working_set.len()
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }
}
