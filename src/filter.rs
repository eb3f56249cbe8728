//! Filter engine: a pure, order-preserving subsequence selection over the
//! snapshot. A record survives iff every active constraint passes.
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{AdRecord, FilterSelection};

/// Apply the selection to the snapshot. With no active constraint this is a
/// no-op returning the snapshot unchanged and in the same order; it never
/// re-sorts.
pub fn apply_filters(snapshot: &[AdRecord], selection: &FilterSelection) -> Vec<AdRecord> {
    if selection.is_empty() {
        return snapshot.to_vec();
    }

    let start = selection.start_date.map(start_of_day);
    let end = selection.end_date.map(end_of_day);

    snapshot
        .iter()
        .filter(|ad| {
            if let Some(sponsor) = &selection.sponsor {
                if &ad.sponsor != sponsor {
                    return false;
                }
            }
            if let Some(newsletter) = &selection.newsletter {
                if &ad.newsletter_name != newsletter {
                    return false;
                }
            }
            if let Some(start) = start {
                if ad.sent_date < start {
                    return false;
                }
            }
            if let Some(end) = end {
                if ad.sent_date > end {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Inclusive lower bound: midnight at the start of the selected day, UTC.
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

/// Inclusive upper bound: 23:59:59.999 of the selected day, UTC.
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is always valid")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ad(id: i64, sponsor: &str, newsletter: &str, sent: DateTime<Utc>) -> AdRecord {
        AdRecord {
            idx: id,
            id,
            created_at: sent,
            sponsor: sponsor.into(),
            ad_text: "text".into(),
            image_url: None,
            newsletter_name: newsletter.into(),
            sent_date: sent,
        }
    }

    fn sent(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn sample() -> Vec<AdRecord> {
        vec![
            ad(1, "Acme", "Morning Brew", sent(2024, 6, 15)),
            ad(2, "Globex", "Morning Brew", sent(2024, 3, 10)),
            ad(3, "Acme", "The Hustle", sent(2024, 1, 1)),
        ]
    }

    #[test]
    fn empty_selection_is_noop() {
        let snapshot = sample();
        let out = apply_filters(&snapshot, &FilterSelection::default());
        assert_eq!(out, snapshot);
    }

    #[test]
    fn sponsor_filter_is_exact_and_case_sensitive() {
        let snapshot = sample();
        let sel = FilterSelection {
            sponsor: Some("Acme".into()),
            ..Default::default()
        };
        let out = apply_filters(&snapshot, &sel);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);

        let sel = FilterSelection {
            sponsor: Some("acme".into()),
            ..Default::default()
        };
        assert!(apply_filters(&snapshot, &sel).is_empty());
    }

    #[test]
    fn constraints_combine_with_and() {
        let snapshot = sample();
        let sel = FilterSelection {
            sponsor: Some("Acme".into()),
            newsletter: Some("Morning Brew".into()),
            ..Default::default()
        };
        let out = apply_filters(&snapshot, &sel);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn start_date_is_inclusive_lower_bound() {
        let snapshot = vec![
            ad(1, "A", "N", sent(2024, 6, 15)),
            ad(2, "A", "N", sent(2024, 1, 1)),
        ];
        let sel = FilterSelection {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        let out = apply_filters(&snapshot, &sel);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);

        // A record at midnight of the start day itself passes.
        let snapshot = vec![ad(3, "A", "N", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())];
        assert_eq!(apply_filters(&snapshot, &sel).len(), 1);
    }

    #[test]
    fn end_date_is_inclusive_through_end_of_day() {
        let sel = FilterSelection {
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        let late_on_day = ad(
            1,
            "A",
            "N",
            Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap(),
        );
        let next_day = ad(2, "A", "N", Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
        let out = apply_filters(&[late_on_day, next_day], &sel);
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let snapshot = sample();
        let sel = FilterSelection {
            sponsor: Some("Acme".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let once = apply_filters(&snapshot, &sel);
        let twice = apply_filters(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn adding_a_constraint_never_grows_the_result() {
        let snapshot = sample();
        let loose = FilterSelection {
            sponsor: Some("Acme".into()),
            ..Default::default()
        };
        let tight = FilterSelection {
            sponsor: Some("Acme".into()),
            newsletter: Some("The Hustle".into()),
            ..Default::default()
        };
        assert!(apply_filters(&snapshot, &tight).len() <= apply_filters(&snapshot, &loose).len());

        let tighter = FilterSelection {
            sponsor: Some("Acme".into()),
            newsletter: Some("The Hustle".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert!(apply_filters(&snapshot, &tighter).len() <= apply_filters(&snapshot, &tight).len());
    }

    #[test]
    fn unmatched_sponsor_yields_empty_set() {
        let snapshot = sample();
        let sel = FilterSelection {
            sponsor: Some("Initech".into()),
            ..Default::default()
        };
        assert!(apply_filters(&snapshot, &sel).is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let snapshot = sample();
        let sel = FilterSelection {
            newsletter: Some("Morning Brew".into()),
            ..Default::default()
        };
        let out = apply_filters(&snapshot, &sel);
        // Subsequence of the snapshot, original order intact.
        assert_eq!(out.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
