//! Bookmark domain model.
//!
//! A bookmark is a rated link with a title and an optional description.
//! All string fields pass through [`sanitize_html`] on the way in and on
//! the way out, so stored and served text never carries live markup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::sanitize::sanitize_html;

/// Lowest accepted rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i64 = 5;

/// Validation failures for bookmark input, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing 'title' in request body")]
    MissingTitle,

    #[error("Missing 'url' in request body")]
    MissingUrl,

    #[error("Missing 'rating' in request body: must be an integer between 1 and 5")]
    MissingRating,

    #[error("'description' must be a string")]
    InvalidDescription,

    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("'rating' must be an integer between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Request body must contain either 'title', 'url', 'description' or 'rating'")]
    EmptyPatch,
}

/// A stored bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Bookmark {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Target URL (not checked for well-formedness).
    pub url: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Rating from 1 to 5.
    pub rating: i64,
}

impl Bookmark {
    /// Apply the HTML sanitizer to every string field.
    pub fn sanitized(self) -> Self {
        Self {
            id: self.id,
            title: sanitize_html(&self.title),
            url: sanitize_html(&self.url),
            description: self.description.as_deref().map(sanitize_html),
            rating: self.rating,
        }
    }

    /// Path of this bookmark's resource, used for the `Location` header.
    pub fn location(&self) -> String {
        format!("/bookmarks/{}", self.id)
    }
}

/// Candidate fields for a new bookmark, as submitted by a client.
///
/// Fields are kept as raw JSON so that a wrong-typed field is reported by
/// [`BookmarkDraft::validate`] in check order, like a missing one.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookmarkDraft {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub url: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub rating: Option<Value>,
}

impl BookmarkDraft {
    /// Validate the draft and turn it into a sanitized bookmark with a fresh id.
    ///
    /// Checks run in a fixed order: title, then url, then rating. The first
    /// failure wins. Emptiness is judged on the sanitized text.
    pub fn validate(self) -> Result<Bookmark, ValidationError> {
        let title = sanitized_text(self.title.as_ref())
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::MissingTitle)?;
        let url = sanitized_text(self.url.as_ref())
            .filter(|u| !u.trim().is_empty())
            .ok_or(ValidationError::MissingUrl)?;
        let rating = self
            .rating
            .as_ref()
            .and_then(parse_rating)
            .filter(|r| is_valid_rating(*r))
            .ok_or(ValidationError::MissingRating)?;
        let description = match &self.description {
            None | Some(Value::Null) => None,
            Some(value) => {
                Some(sanitized_text(Some(value)).ok_or(ValidationError::InvalidDescription)?)
            }
        };

        Ok(Bookmark {
            id: Uuid::new_v4(),
            title,
            url,
            description,
            rating,
        })
    }
}

/// A partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

impl BookmarkPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }

    /// Check that at least one field is present, sanitize the string fields,
    /// then check that every present field is acceptable.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        let patch = Self {
            title: self.title.as_deref().map(sanitize_html),
            url: self.url.as_deref().map(sanitize_html),
            description: self.description.as_deref().map(sanitize_html),
            rating: self.rating,
        };

        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyField("title"));
        }
        if patch.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(ValidationError::EmptyField("url"));
        }
        if let Some(rating) = patch.rating.filter(|r| !is_valid_rating(*r)) {
            return Err(ValidationError::InvalidRating(rating));
        }

        Ok(patch)
    }
}

/// Sanitized contents of a JSON string; any other JSON type yields `None`.
fn sanitized_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(sanitize_html(text)),
        _ => None,
    }
}

/// Read a rating from an integer, an integral float (`3.0`) or a numeric
/// string (`"3"`).
fn parse_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(title: Option<&str>, url: Option<&str>, rating: Option<i64>) -> BookmarkDraft {
        BookmarkDraft {
            title: title.map(|t| json!(t)),
            url: url.map(|u| json!(u)),
            description: Some(json!("A site")),
            rating: rating.map(|r| json!(r)),
        }
    }

    fn draft_from(body: Value) -> BookmarkDraft {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_valid_draft_gets_id_and_keeps_fields() {
        let bookmark = draft(Some("Rust"), Some("https://rust-lang.org"), Some(5))
            .validate()
            .unwrap();
        assert_eq!(bookmark.title, "Rust");
        assert_eq!(bookmark.url, "https://rust-lang.org");
        assert_eq!(bookmark.description.as_deref(), Some("A site"));
        assert_eq!(bookmark.rating, 5);
        assert_eq!(bookmark.location(), format!("/bookmarks/{}", bookmark.id));
    }

    #[test]
    fn test_title_checked_before_url_and_rating() {
        let err = draft(None, None, None).validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = draft(None, Some("https://x.com"), Some(3))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);
    }

    #[test]
    fn test_url_checked_before_rating() {
        let err = draft(Some("t"), Some(""), None).validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingUrl);
    }

    #[test]
    fn test_rating_bounds() {
        for rating in [0, 6, -1] {
            let err = draft(Some("t"), Some("u"), Some(rating))
                .validate()
                .unwrap_err();
            assert_eq!(err, ValidationError::MissingRating);
        }
        for rating in [1, 5] {
            assert!(draft(Some("t"), Some("u"), Some(rating)).validate().is_ok());
        }
    }

    #[test]
    fn test_draft_is_sanitized() {
        let bookmark = draft(
            Some(r#"Naughty <script>alert("xss");</script>"#),
            Some("https://x.com"),
            Some(1),
        )
        .validate()
        .unwrap();
        assert_eq!(
            bookmark.title,
            r#"Naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert_eq!(
            BookmarkPatch::default().validate().unwrap_err(),
            ValidationError::EmptyPatch
        );
    }

    #[test]
    fn test_patch_zero_rating_is_invalid_not_absent() {
        let patch = BookmarkPatch {
            rating: Some(0),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err(), ValidationError::InvalidRating(0));
    }

    #[test]
    fn test_patch_empty_title_rejected() {
        let patch = BookmarkPatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err(),
            ValidationError::EmptyField("title")
        );
    }

    #[test]
    fn test_patch_sanitizes_description() {
        let patch = BookmarkPatch {
            description: Some("<b onclick=\"x()\">hi</b>".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.description.as_deref(), Some("<b>hi</b>"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_fields_empty_after_sanitizing_are_missing() {
        let err = draft(Some("<!-- hi -->"), Some("https://x.com"), Some(3))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = draft(Some("t"), Some("<!---->"), Some(3))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingUrl);
    }

    #[test]
    fn test_wrong_types_follow_check_order() {
        let err = draft_from(json!({"url": "https://x.com", "rating": "5"}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = draft_from(json!({"title": 42, "url": "u", "rating": 3}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = draft_from(json!({"title": "t", "url": ["u"], "rating": 3}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingUrl);

        for rating in [json!(true), json!("five"), json!(3.5), json!({})] {
            let err = draft_from(json!({"title": "t", "url": "u", "rating": rating}))
                .validate()
                .unwrap_err();
            assert_eq!(err, ValidationError::MissingRating);
        }

        let body = json!({"title": "t", "url": "u", "rating": 3, "description": 7});
        let err = draft_from(body).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidDescription);
    }

    #[test]
    fn test_numeric_rating_forms_accepted() {
        for rating in [json!(3), json!(3.0), json!("3"), json!(" 3 ")] {
            let bookmark = draft_from(json!({"title": "t", "url": "u", "rating": rating}))
                .validate()
                .unwrap();
            assert_eq!(bookmark.rating, 3);
        }
        let err = draft_from(json!({"title": "t", "url": "u", "rating": "6"}))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingRating);
    }

    #[test]
    fn test_null_description_is_absent() {
        let body = json!({"title": "t", "url": "u", "rating": 1, "description": null});
        let bookmark = draft_from(body).validate().unwrap();
        assert!(bookmark.description.is_none());
    }

    #[test]
    fn test_patch_field_empty_after_sanitizing_rejected() {
        let patch = BookmarkPatch {
            title: Some("<!-- gone -->".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err(),
            ValidationError::EmptyField("title")
        );

        let patch = BookmarkPatch {
            url: Some("<!---->".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err(), ValidationError::EmptyField("url"));
    }
}
