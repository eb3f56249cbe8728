use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One newsletter advertisement row, exactly as the store returns it.
/// A snapshot is a sequence of these ordered by `sent_date` descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdRecord {
    pub idx: i64,
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub sponsor: String,
    pub ad_text: String,
    pub image_url: Option<String>,
    pub newsletter_name: String,
    pub sent_date: DateTime<Utc>,
}

/// The current filter constraints. `None` means "no constraint" for that
/// dimension; a record must pass every active constraint to stay in the
/// working set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub sponsor: Option<String>,
    pub newsletter: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.sponsor.is_none()
            && self.newsletter.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Clear all four constraints.
    pub fn reset(&mut self) {
        *self = FilterSelection::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn selection_reset_clears_everything() {
        let mut sel = FilterSelection {
            sponsor: Some("Acme".into()),
            newsletter: Some("Morning Brew".into()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        };
        assert!(!sel.is_empty());
        sel.reset();
        assert!(sel.is_empty());
    }

    #[test]
    fn ad_record_round_trips_wire_shape() {
        let json = r#"{
            "idx": 3,
            "id": 42,
            "created_at": "2024-06-01T08:00:00Z",
            "sponsor": "Acme",
            "ad_text": "Buy anvils.",
            "image_url": null,
            "newsletter_name": "Morning Brew",
            "sent_date": "2024-06-15T10:30:00+00:00"
        }"#;
        let ad: AdRecord = serde_json::from_str(json).unwrap();
        assert_eq!(ad.id, 42);
        assert!(ad.image_url.is_none());
        assert_eq!(
            ad.sent_date,
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
        );
    }
}
