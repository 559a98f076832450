//! Boundary coercion of loosely typed form fields.
//!
//! Create and update requests arrive as `name -> text` pairs (HTML form
//! posts, multipart text parts, or a flat JSON object of strings). Every
//! value is parsed into its strict type here, before anything reaches the
//! store. A parse failure is a [`CoreError::Validation`] naming the field.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::{CalendarDate, DbId};

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel culture-medium value meaning "use the free-text field instead".
pub const OTHER_MEDIUM: &str = "other";

/// A bag of text fields keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat JSON object. Strings are taken as-is, numbers and
    /// booleans are stringified, `null` is treated as an empty value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CoreError::validation("body", "expected a JSON object"))?;

        let mut fields = HashMap::with_capacity(obj.len());
        for (key, v) in obj {
            let text = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(CoreError::validation(
                        key.as_str(),
                        "expected a scalar value",
                    ))
                }
            };
            fields.insert(key.clone(), text);
        }
        Ok(Self { fields })
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Whether the field was supplied at all (even if empty).
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Non-empty trimmed value, or `None` when absent or blank.
    fn non_empty(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|s| !s.is_empty())
    }

    /// The value exactly as submitted, or `None` when absent or blank.
    fn non_blank(&self, name: &str) -> Option<&str> {
        self.raw(name).filter(|s| !s.trim().is_empty())
    }

    /// A required, non-blank text field, stored as submitted.
    pub fn required_text(&self, name: &str) -> Result<String, CoreError> {
        self.non_blank(name)
            .map(str::to_string)
            .ok_or_else(|| CoreError::validation(name, "is required"))
    }

    /// An optional text field. Absent and blank both map to `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.non_blank(name).map(str::to_string)
    }

    /// For updates: `None` when not supplied, `Some(None)` when supplied blank.
    pub fn text_patch(&self, name: &str) -> Option<Option<String>> {
        self.has(name).then(|| self.text(name))
    }

    pub fn required_date(&self, name: &str) -> Result<CalendarDate, CoreError> {
        let raw = self
            .non_empty(name)
            .ok_or_else(|| CoreError::validation(name, "is required"))?;
        parse_date(name, raw)
    }

    pub fn optional_date(&self, name: &str) -> Result<Option<CalendarDate>, CoreError> {
        self.non_empty(name).map(|raw| parse_date(name, raw)).transpose()
    }

    /// For updates of a nullable date column.
    pub fn date_patch(&self, name: &str) -> Result<Option<Option<CalendarDate>>, CoreError> {
        if self.has(name) {
            self.optional_date(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// A nullable float. Empty input is stored as absent, never as zero.
    pub fn optional_f64(&self, name: &str) -> Result<Option<f64>, CoreError> {
        self.non_empty(name)
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CoreError::validation(name, format!("'{raw}' is not a number")))
            })
            .transpose()
    }

    /// For updates of a nullable float column.
    pub fn f64_patch(&self, name: &str) -> Result<Option<Option<f64>>, CoreError> {
        if self.has(name) {
            self.optional_f64(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// An integer that falls back to `default` when absent or blank.
    pub fn i32_or(&self, name: &str, default: i32) -> Result<i32, CoreError> {
        Ok(self.optional_i32(name)?.unwrap_or(default))
    }

    pub fn optional_i32(&self, name: &str) -> Result<Option<i32>, CoreError> {
        self.non_empty(name)
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    CoreError::validation(name, format!("'{raw}' is not a whole number"))
                })
            })
            .transpose()
    }

    pub fn optional_id(&self, name: &str) -> Result<Option<DbId>, CoreError> {
        self.non_empty(name)
            .map(|raw| {
                raw.parse::<DbId>()
                    .map_err(|_| CoreError::validation(name, format!("'{raw}' is not a valid id")))
            })
            .transpose()
    }

    pub fn required_id(&self, name: &str) -> Result<DbId, CoreError> {
        self.optional_id(name)?
            .ok_or_else(|| CoreError::validation(name, "is required"))
    }

    /// For updates of a nullable foreign key.
    pub fn id_patch(&self, name: &str) -> Result<Option<Option<DbId>>, CoreError> {
        if self.has(name) {
            self.optional_id(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Culture medium selection. When the chosen value is [`OTHER_MEDIUM`],
    /// the free-text `other_name` field is used instead.
    pub fn culture_medium(&self, name: &str, other_name: &str) -> Option<String> {
        match self.text(name) {
            Some(medium) if medium.trim() == OTHER_MEDIUM => self.text(other_name),
            other => other,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date, naming `field` on failure.
pub fn parse_date(field: &str, raw: &str) -> Result<CalendarDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::validation(field, format!("'{raw}' is not a date (expected YYYY-MM-DD)"))
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn required_text_rejects_blank() {
        let f = form(&[("code", "   ")]);
        assert_matches!(
            f.required_text("code"),
            Err(CoreError::Validation { field, .. }) if field == "code"
        );
    }

    #[test]
    fn text_keeps_surrounding_whitespace() {
        let f = form(&[("code", " COL001 "), ("notes", "  indented\n")]);
        assert_eq!(f.required_text("code").unwrap(), " COL001 ");
        assert_eq!(f.text("notes").as_deref(), Some("  indented\n"));
        assert_eq!(f.text_patch("notes"), Some(Some("  indented\n".to_string())));
    }

    #[test]
    fn date_parses_calendar_date() {
        let f = form(&[("collection_date", "2024-03-15")]);
        assert_eq!(
            f.required_date("collection_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn malformed_date_names_field() {
        let f = form(&[("isolation_date", "15/03/2024")]);
        assert_matches!(
            f.required_date("isolation_date"),
            Err(CoreError::Validation { field, .. }) if field == "isolation_date"
        );
    }

    #[test]
    fn impossible_date_is_rejected() {
        let f = form(&[("start_date", "2024-02-30")]);
        assert!(f.optional_date("start_date").is_err());
    }

    #[test]
    fn empty_float_is_absent_not_zero() {
        let f = form(&[("incubation_temperature", "")]);
        assert_eq!(f.optional_f64("incubation_temperature").unwrap(), None);
        assert_eq!(f.f64_patch("incubation_temperature").unwrap(), Some(None));
    }

    #[test]
    fn float_parses_and_rejects_garbage() {
        let f = form(&[("t", "25.5"), ("bad", "warm"), ("nan", "NaN")]);
        assert_eq!(f.optional_f64("t").unwrap(), Some(25.5));
        assert!(f.optional_f64("bad").is_err());
        assert!(f.optional_f64("nan").is_err());
    }

    #[test]
    fn missing_field_patch_is_untouched() {
        let f = form(&[]);
        assert_eq!(f.f64_patch("incubation_temperature").unwrap(), None);
        assert_eq!(f.text_patch("notes"), None);
        assert_eq!(f.date_patch("end_date").unwrap(), None);
    }

    #[test]
    fn plate_count_defaults_to_one() {
        let f = form(&[("plate_count", "")]);
        assert_eq!(f.i32_or("plate_count", 1).unwrap(), 1);
        let f = form(&[("plate_count", "5")]);
        assert_eq!(f.i32_or("plate_count", 1).unwrap(), 5);
    }

    #[test]
    fn other_medium_uses_free_text() {
        let f = form(&[("culture_medium", "other"), ("other_medium", "Oat agar")]);
        assert_eq!(
            f.culture_medium("culture_medium", "other_medium").as_deref(),
            Some("Oat agar")
        );
        let f = form(&[("culture_medium", "PDA"), ("other_medium", "ignored")]);
        assert_eq!(
            f.culture_medium("culture_medium", "other_medium").as_deref(),
            Some("PDA")
        );
    }

    #[test]
    fn from_json_stringifies_scalars() {
        let value = serde_json::json!({
            "code": "ISO001",
            "collection_id": 4,
            "incubation_temperature": null,
        });
        let f = FormFields::from_json(&value).unwrap();
        assert_eq!(f.required_id("collection_id").unwrap(), 4);
        assert!(f.has("incubation_temperature"));
        assert_eq!(f.optional_f64("incubation_temperature").unwrap(), None);
    }

    #[test]
    fn from_json_rejects_nested_values() {
        let value = serde_json::json!({ "notes": ["a", "b"] });
        assert_matches!(
            FormFields::from_json(&value),
            Err(CoreError::Validation { field, .. }) if field == "notes"
        );
    }
}
