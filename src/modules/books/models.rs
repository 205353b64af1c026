use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A catalog record with reading progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque identifier, generated at creation
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    /// `read_page == page_count`, recomputed on every write
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Reduced projection used in listings
    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }

    /// Overwrite every user-supplied field; `id` and `inserted_at` are kept
    pub(crate) fn apply(&mut self, fields: BookFields, now: OffsetDateTime) {
        self.finished = fields.is_finished();
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.updated_at = now;
    }
}

/// `{id, name, publisher}` as returned by `GET /books`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Request body for creating or replacing a book.
///
/// Absent or `null` fields fall back to their zero value so that presence of
/// `name` is checked by validation rather than by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookFields {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub read_page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub reading: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BookFields {
    pub fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Listing filter; a listing applies at most one criterion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookFilter {
    #[default]
    All,
    /// Case-insensitive substring of the name
    NameContains(String),
    /// `None` holds a value that is not a flag and matches no book
    Reading(Option<bool>),
    Finished(Option<bool>),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::NameContains(needle) => book
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            BookFilter::Reading(flag) => *flag == Some(book.reading),
            BookFilter::Finished(flag) => *flag == Some(book.finished),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(name: &str, reading: bool, finished: bool) -> Book {
        let now = OffsetDateTime::UNIX_EPOCH;
        Book {
            id: "b1".to_string(),
            name: name.to_string(),
            year: 2010,
            author: "John Doe".to_string(),
            summary: "Lorem ipsum".to_string(),
            publisher: "Dicoding".to_string(),
            page_count: 100,
            read_page: if finished { 100 } else { 25 },
            finished,
            reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn book_serializes_with_camel_case_and_iso_timestamps() {
        let value = serde_json::to_value(book("Buku A", true, false)).unwrap();

        assert_eq!(value["pageCount"], 100);
        assert_eq!(value["readPage"], 25);
        assert_eq!(value["insertedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["updatedAt"], "1970-01-01T00:00:00Z");
        assert!(value.get("page_count").is_none());
    }

    #[test]
    fn fields_default_when_absent() {
        let fields: BookFields = serde_json::from_value(json!({"name": "Buku A"})).unwrap();
        assert_eq!(fields.name, "Buku A");
        assert_eq!(fields.page_count, 0);
        assert!(!fields.reading);
        assert!(fields.is_finished());
    }

    #[test]
    fn null_fields_read_as_absent() {
        let fields: BookFields =
            serde_json::from_value(json!({"name": null, "readPage": null, "reading": null}))
                .unwrap();
        assert_eq!(fields, BookFields::default());
    }

    #[test]
    fn negative_page_count_is_rejected() {
        let parsed = serde_json::from_value::<BookFields>(json!({"name": "x", "pageCount": -1}));
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(BookFilter::default().matches(&book("anything", false, false)));
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = BookFilter::NameContains("DICO".to_string());
        assert!(filter.matches(&book("Kelas Dicoding", false, false)));
        assert!(!filter.matches(&book("Rust in Action", false, false)));
        assert!(BookFilter::NameContains(String::new()).matches(&book("x", false, false)));
    }

    #[test]
    fn flag_filters_compare_one_field() {
        assert!(BookFilter::Reading(Some(true)).matches(&book("a", true, true)));
        assert!(!BookFilter::Reading(Some(true)).matches(&book("b", false, true)));
        assert!(BookFilter::Finished(Some(false)).matches(&book("c", true, false)));
        assert!(!BookFilter::Finished(Some(false)).matches(&book("d", false, true)));
    }

    #[test]
    fn unrecognized_flag_matches_nothing() {
        assert!(!BookFilter::Reading(None).matches(&book("a", true, false)));
        assert!(!BookFilter::Reading(None).matches(&book("b", false, false)));
        assert!(!BookFilter::Finished(None).matches(&book("c", false, true)));
    }
}
