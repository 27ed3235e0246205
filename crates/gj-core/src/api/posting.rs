use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Default-locale attributes writable through the posting surfaces.
pub const EDITABLE_FIELDS: &[&str] = &[
    "title",
    "description",
    "qualification",
    "experience",
    "languages",
    "salary",
    "city",
    "hours",
    "days",
    "company_name",
    "posted_at",
];

const REQUIRED_FIELDS: &[&str] = &["title", "description", "city"];

#[derive(Debug, Error, PartialEq)]
pub enum PostingValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {0} must be a string")]
    NotAString(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid posted_at value: {0}")]
    InvalidDate(String),
    #[error("no editable fields supplied")]
    EmptyPatch,
}

/// Validated payload for posting creation. The Arabic side is never
/// writable here; new rows always start `pending`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingDraft {
    pub title: String,
    pub description: String,
    pub city: String,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<String>,
    pub salary: Option<String>,
    pub hours: Option<String>,
    pub days: Option<String>,
    pub company_name: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Validated partial edit of the default-locale fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<String>,
    pub salary: Option<String>,
    pub city: Option<String>,
    pub hours: Option<String>,
    pub days: Option<String>,
    pub company_name: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl PostingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.qualification.is_none()
            && self.experience.is_none()
            && self.languages.is_none()
            && self.salary.is_none()
            && self.city.is_none()
            && self.hours.is_none()
            && self.days.is_none()
            && self.company_name.is_none()
            && self.posted_at.is_none()
    }
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` (interpreted as midnight UTC).
fn parse_posted_at(raw: &str) -> Result<DateTime<Utc>, PostingValidationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| PostingValidationError::InvalidDate(raw.to_string()))
}

fn string_field(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>, PostingValidationError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(PostingValidationError::NotAString(key.to_string())),
    }
}

fn reject_unknown_keys(
    object: &serde_json::Map<String, Value>,
) -> Result<(), PostingValidationError> {
    for key in object.keys() {
        if !EDITABLE_FIELDS.contains(&key.as_str()) {
            return Err(PostingValidationError::UnknownField(key.clone()));
        }
    }
    Ok(())
}

fn date_field(
    object: &serde_json::Map<String, Value>,
) -> Result<Option<DateTime<Utc>>, PostingValidationError> {
    match string_field(object, "posted_at")? {
        Some(raw) => parse_posted_at(&raw).map(Some),
        None => Ok(None),
    }
}

/// Validate a posting-creation body. Required fields must be present and
/// non-blank; every supplied value must be a string; dates must parse.
pub fn parse_new_posting(value: &Value) -> Result<PostingDraft, PostingValidationError> {
    let object = value
        .as_object()
        .ok_or(PostingValidationError::NotAnObject)?;
    reject_unknown_keys(object)?;

    let mut required = Vec::with_capacity(REQUIRED_FIELDS.len());
    for &field in REQUIRED_FIELDS {
        let value = string_field(object, field)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(PostingValidationError::MissingField(field))?;
        required.push(value);
    }
    let mut required = required.into_iter();

    Ok(PostingDraft {
        title: required.next().unwrap_or_default(),
        description: required.next().unwrap_or_default(),
        city: required.next().unwrap_or_default(),
        qualification: string_field(object, "qualification")?,
        experience: string_field(object, "experience")?,
        languages: string_field(object, "languages")?,
        salary: string_field(object, "salary")?,
        hours: string_field(object, "hours")?,
        days: string_field(object, "days")?,
        company_name: string_field(object, "company_name")?,
        posted_at: date_field(object)?,
    })
}

/// Validate a partial edit body. Only default-locale attributes are
/// accepted; at least one field must be supplied.
pub fn parse_patch(value: &Value) -> Result<PostingPatch, PostingValidationError> {
    let object = value
        .as_object()
        .ok_or(PostingValidationError::NotAnObject)?;
    reject_unknown_keys(object)?;

    let patch = PostingPatch {
        title: string_field(object, "title")?,
        description: string_field(object, "description")?,
        qualification: string_field(object, "qualification")?,
        experience: string_field(object, "experience")?,
        languages: string_field(object, "languages")?,
        salary: string_field(object, "salary")?,
        city: string_field(object, "city")?,
        hours: string_field(object, "hours")?,
        days: string_field(object, "days")?,
        company_name: string_field(object, "company_name")?,
        posted_at: date_field(object)?,
    };

    if patch.is_empty() {
        return Err(PostingValidationError::EmptyPatch);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn creation_requires_title_description_city() {
        let err = parse_new_posting(&json!({"title": "Nurse", "city": "Dubai"})).unwrap_err();
        assert_eq!(err, PostingValidationError::MissingField("description"));

        let err = parse_new_posting(&json!({"title": "  ", "description": "x", "city": "Dubai"}))
            .unwrap_err();
        assert_eq!(err, PostingValidationError::MissingField("title"));
    }

    #[test]
    fn creation_rejects_non_string_values() {
        let err = parse_new_posting(
            &json!({"title": "Nurse", "description": "Care work", "city": "Dubai", "salary": 9000}),
        )
        .unwrap_err();
        assert_eq!(err, PostingValidationError::NotAString("salary".into()));
    }

    #[test]
    fn creation_rejects_unknown_and_arabic_fields() {
        let err = parse_new_posting(
            &json!({"title": "Nurse", "description": "Care work", "city": "Dubai", "title_ar": "ممرض"}),
        )
        .unwrap_err();
        assert_eq!(err, PostingValidationError::UnknownField("title_ar".into()));
    }

    #[test]
    fn creation_parses_both_date_shapes() {
        let draft = parse_new_posting(&json!({
            "title": "Nurse",
            "description": "Care work",
            "city": "Dubai",
            "posted_at": "2026-07-01"
        }))
        .unwrap();
        assert_eq!(draft.posted_at.unwrap().to_rfc3339(), "2026-07-01T00:00:00+00:00");

        let draft = parse_new_posting(&json!({
            "title": "Nurse",
            "description": "Care work",
            "city": "Dubai",
            "posted_at": "2026-07-01T09:30:00Z"
        }))
        .unwrap();
        assert!(draft.posted_at.is_some());
    }

    #[test]
    fn creation_rejects_malformed_dates() {
        let err = parse_new_posting(&json!({
            "title": "Nurse",
            "description": "Care work",
            "city": "Dubai",
            "posted_at": "01/07/2026"
        }))
        .unwrap_err();
        assert_eq!(err, PostingValidationError::InvalidDate("01/07/2026".into()));
    }

    #[test]
    fn patch_accepts_a_subset_of_fields() {
        let patch = parse_patch(&json!({"salary": "12000 AED", "hours": "9-6"})).unwrap();
        assert_eq!(patch.salary.as_deref(), Some("12000 AED"));
        assert_eq!(patch.hours.as_deref(), Some("9-6"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn patch_rejects_empty_and_non_object_bodies() {
        assert_eq!(
            parse_patch(&json!({})).unwrap_err(),
            PostingValidationError::EmptyPatch
        );
        assert_eq!(
            parse_patch(&json!([1, 2])).unwrap_err(),
            PostingValidationError::NotAnObject
        );
    }

    #[test]
    fn patch_rejects_non_string_values() {
        let err = parse_patch(&json!({"days": 5})).unwrap_err();
        assert_eq!(err, PostingValidationError::NotAString("days".into()));
    }
}
