//! Facet derivation: the distinct sponsor and newsletter values present in
//! the full snapshot, with how many records each value accounts for. Counts
//! are always over the whole snapshot, never the filtered working set.
use std::collections::HashMap;

use crate::model::AdRecord;

/// Distinct values of one categorical field and their occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFacets {
    /// Exact values as stored, sorted ascending case-insensitively so that
    /// "acme" and "Acme" sit next to each other in a selector.
    pub values: Vec<String>,
    pub counts: HashMap<String, usize>,
}

impl FieldFacets {
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub sponsors: FieldFacets,
    pub newsletters: FieldFacets,
}

/// Recompute both facet sets from scratch. Called whenever the snapshot
/// changes; there is no incremental update path.
pub fn derive_facets(snapshot: &[AdRecord]) -> Facets {
    Facets {
        sponsors: derive_field(snapshot, |ad| &ad.sponsor),
        newsletters: derive_field(snapshot, |ad| &ad.newsletter_name),
    }
}

fn derive_field<F>(snapshot: &[AdRecord], field: F) -> FieldFacets
where
    F: Fn(&AdRecord) -> &String,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for ad in snapshot {
        *counts.entry(field(ad).clone()).or_insert(0) += 1;
    }

    let mut values: Vec<String> = counts.keys().cloned().collect();
    // Case-insensitive ordering for display; exact value as tiebreaker to
    // keep the order deterministic.
    values.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });

    FieldFacets { values, counts }
}
