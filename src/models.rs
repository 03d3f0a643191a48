// Data shapes exchanged with the backend plus the editable book form.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque book identifier assigned by the backend. The backend may send it
/// as a JSON string or a number; either way it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        BookId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => BookId(s),
            RawId::Number(n) => BookId(n.to_string()),
        })
    }
}

/// A catalog entry as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(alias = "uid")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: String,
    pub page_count: u32,
    pub language: String,
}

/// Book fields without the identifier: the body of create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: String,
    pub page_count: u32,
    pub language: String,
}

/// Raw text of the book form, one string per input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: String,
    pub page_count: String,
    pub language: String,
}

impl BookForm {
    /// Pre-populate the form from an existing book (everything but the id).
    pub fn from_book(book: &Book) -> Self {
        BookForm {
            title: book.title.clone(),
            author: book.author.clone(),
            publisher: book.publisher.clone(),
            published_date: book.published_date.clone(),
            page_count: book.page_count.to_string(),
            language: book.language.clone(),
        }
    }

    /// Convert to a draft. Every text field is required; page count is
    /// coerced with [`parse_page_count`] and never rejected.
    pub fn to_draft(&self) -> Result<BookDraft, MissingField> {
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Publisher", &self.publisher),
            ("Published date", &self.published_date),
            ("Language", &self.language),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(MissingField(*name));
        }
        Ok(BookDraft {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            published_date: self.published_date.trim().to_string(),
            page_count: parse_page_count(&self.page_count),
            language: self.language.trim().to_string(),
        })
    }
}

/// A required form field left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required", self.0)
    }
}

/// Permissive integer parse: leading whitespace is skipped and the leading
/// run of decimal digits is used. Anything unparseable, negative or out of
/// range becomes 0.
pub fn parse_page_count(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let digits: &str = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    digits.parse().unwrap_or(0)
}

/// Body of `POST /user/`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Form body of `POST /user/login`. The backend expects the email under
/// the `username` key.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Error payload attached to 4xx responses. `detail` is usually a string
/// but validation errors may carry a structure; only strings are shown.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_coercion() {
        assert_eq!(parse_page_count("42"), 42);
        assert_eq!(parse_page_count("abc"), 0);
        assert_eq!(parse_page_count(""), 0);
        assert_eq!(parse_page_count("  17"), 17);
        assert_eq!(parse_page_count("42abc"), 42);
        assert_eq!(parse_page_count("12.5"), 12);
        assert_eq!(parse_page_count("-5"), 0);
        assert_eq!(parse_page_count("99999999999"), 0);
    }

    #[test]
    fn book_accepts_uid_or_numeric_id() {
        let from_uid: Book = serde_json::from_str(
            r#"{"uid":"a1","title":"A","author":"X","publisher":"P",
                "published_date":"2020-01-01","page_count":10,"language":"en"}"#,
        )
        .unwrap();
        assert_eq!(from_uid.id.as_str(), "a1");

        let from_number: Book = serde_json::from_str(
            r#"{"id":1,"title":"A","author":"X","publisher":"P",
                "published_date":"2020-01-01","page_count":10,"language":"en"}"#,
        )
        .unwrap();
        assert_eq!(from_number.id, BookId::new("1"));
    }

    #[test]
    fn draft_serializes_without_id() {
        let draft = BookDraft {
            title: "Dune".into(),
            page_count: 412,
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["page_count"], 412);
    }

    #[test]
    fn form_requires_text_fields() {
        let form = BookForm {
            title: "Dune".into(),
            author: "Herbert".into(),
            publisher: " ".into(),
            published_date: "1965-08-01".into(),
            page_count: "412".into(),
            language: "en".into(),
        };
        let err = form.to_draft().unwrap_err();
        assert_eq!(err.to_string(), "Publisher is required");
    }

    #[test]
    fn form_round_trips_an_existing_book() {
        let book = Book {
            id: BookId::new("7"),
            title: "Dune".into(),
            author: "Herbert".into(),
            publisher: "Chilton".into(),
            published_date: "1965-08-01".into(),
            page_count: 412,
            language: "en".into(),
        };
        let draft = BookForm::from_book(&book).to_draft().unwrap();
        assert_eq!(
            draft,
            BookDraft {
                title: "Dune".into(),
                author: "Herbert".into(),
                publisher: "Chilton".into(),
                published_date: "1965-08-01".into(),
                page_count: 412,
                language: "en".into(),
            }
        );
    }

    #[test]
    fn error_detail_only_uses_strings() {
        let plain: ErrorDetail = serde_json::from_str(r#"{"detail":"Invalid credentials"}"#).unwrap();
        assert_eq!(plain.message(), Some("Invalid credentials"));

        let structured: ErrorDetail =
            serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert_eq!(structured.message(), None);

        let missing: ErrorDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.message(), None);
    }
}
