/// Stable unique key of a catalog record.
pub type RecordId = u64;

/// A catalog record as displayed in the table.
///
/// Only `id` is required. Display fields are optional and normalized at the
/// fetch boundary: blank strings become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub title: Option<String>,
    pub place_of_origin: Option<String>,
    pub artist_display: Option<String>,
    pub inscriptions: Option<String>,
    pub date_start: Option<i32>,
    pub date_end: Option<i32>,
}

impl Record {
    /// A record with only an id, for tests and synthetic catalogs.
    pub fn with_id(id: RecordId) -> Self {
        Self {
            id,
            title: None,
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    /// Validate a raw JSON object into a `Record`.
    ///
    /// Returns `None` when `id` is missing or not a non-negative integer.
    /// Display fields of the wrong type are treated as absent rather than
    /// rejecting the whole record.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let id = value.get("id")?.as_u64()?;
        Some(Self {
            id,
            title: text_field(value, "title"),
            place_of_origin: text_field(value, "place_of_origin"),
            artist_display: text_field(value, "artist_display"),
            inscriptions: text_field(value, "inscriptions"),
            date_start: year_field(value, "date_start"),
            date_end: year_field(value, "date_end"),
        })
    }

    pub fn title_label(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn origin_label(&self) -> &str {
        self.place_of_origin.as_deref().unwrap_or("")
    }

    pub fn artist_label(&self) -> &str {
        self.artist_display.as_deref().unwrap_or("")
    }

    /// Inscriptions, or `-` when there are none.
    pub fn inscriptions_label(&self) -> &str {
        self.inscriptions.as_deref().unwrap_or("-")
    }

    pub fn year_label(year: Option<i32>) -> String {
        year.map(|y| y.to_string()).unwrap_or_default()
    }
}

fn text_field(value: &serde_json::Value, key: &str) -> Option<String> {
    let s = value.get(key)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn year_field(value: &serde_json::Value, key: &str) -> Option<i32> {
    let v = value.get(key)?;
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f as i64))
        .and_then(|n| i32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_reads_all_fields() {
        let v = json!({
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "place_of_origin": "France",
            "artist_display": "Georges Seurat",
            "inscriptions": "Signed lower right",
            "date_start": 1884,
            "date_end": 1886,
        });
        let r = Record::from_value(&v).unwrap();
        assert_eq!(r.id, 27992);
        assert_eq!(r.title_label(), "A Sunday on La Grande Jatte");
        assert_eq!(r.origin_label(), "France");
        assert_eq!(r.date_start, Some(1884));
        assert_eq!(r.date_end, Some(1886));
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(Record::from_value(&json!({ "title": "Untitled" })).is_none());
        assert!(Record::from_value(&json!({ "id": "abc" })).is_none());
        assert!(Record::from_value(&json!({ "id": -4 })).is_none());
    }

    #[test]
    fn null_inscriptions_display_as_dash() {
        let r = Record::from_value(&json!({ "id": 1, "inscriptions": null })).unwrap();
        assert_eq!(r.inscriptions, None);
        assert_eq!(r.inscriptions_label(), "-");
    }

    #[test]
    fn blank_strings_become_none() {
        let r = Record::from_value(&json!({ "id": 1, "title": "   ", "artist_display": "" }))
            .unwrap();
        assert_eq!(r.title, None);
        assert_eq!(r.artist_display, None);
    }

    #[test]
    fn wrongly_typed_display_fields_are_dropped() {
        let r = Record::from_value(&json!({ "id": 3, "title": 42, "date_start": "1900" })).unwrap();
        assert_eq!(r.title, None);
        assert_eq!(r.date_start, None);
    }
}
