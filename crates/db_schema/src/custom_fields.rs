//! Typed values for the per-post-type fields of a posting.
//!
//! A posting stores its custom values as one JSON text column. Every value carries its kind, so
//! reading a posting never depends on the current shape of its post type.

use crate::source::post_type::{PostTypeField, FIXED_FIELDS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use comflex_db_schema_file::enums::FieldType;
use comflex_utils::{
  error::{ComflexErrorType, ComflexResult},
  utils::validation::{is_valid_phone, is_valid_url},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CustomFieldValue {
  Text(String),
  Number(f64),
  /// ISO-8601 date or date-time
  Date(String),
  Boolean(bool),
  /// Storage path of an uploaded file, relative to the media directory
  File(String),
  Url(String),
  Phone(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Custom values of one posting, keyed by lowercase field name.
pub struct CustomFields(pub BTreeMap<String, CustomFieldValue>);

impl CustomFields {
  pub fn encode(&self) -> ComflexResult<String> {
    Ok(serde_json::to_string(&self.0)?)
  }

  /// Decodes a stored blob. Anything unreadable yields an empty map.
  pub fn decode(blob: &str) -> Self {
    match serde_json::from_str::<BTreeMap<String, CustomFieldValue>>(blob) {
      Ok(map) => CustomFields(map),
      Err(e) => {
        debug!("Ignoring undecodable custom fields: {e}");
        CustomFields::default()
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&CustomFieldValue> {
    self.0.get(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Storage paths of the uploaded files these values refer to.
  pub fn stored_files(&self) -> Vec<String> {
    self
      .0
      .values()
      .filter_map(|value| match value {
        CustomFieldValue::File(path) => Some(path.clone()),
        _ => None,
      })
      .collect()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One input of a posting form.
pub struct PostingFormField {
  /// Field name as defined in the post type
  pub name: String,
  /// Lowercase name, used as key in `CustomFields`
  pub key: String,
  pub field_type: FieldType,
  pub required: bool,
}

/// Builds the inputs for a post type. The fixed title and description fields are left out, they
/// map to the posting name and description instead.
pub fn posting_form(fields: &[PostTypeField]) -> Vec<PostingFormField> {
  fields
    .iter()
    .filter(|f| !is_fixed_name(&f.name))
    .map(|f| PostingFormField {
      name: f.name.clone(),
      key: f.name.to_lowercase(),
      field_type: f.field_type,
      required: f.is_fixed,
    })
    .collect()
}

/// Fixed field names are reserved in every post type, compared case-insensitively.
pub fn is_fixed_name(name: &str) -> bool {
  let name = name.trim().to_lowercase();
  FIXED_FIELDS.contains(&name.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A file sent for an image field, base64 encoded.
pub struct PendingUpload {
  pub file_name: String,
  pub data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
  Value(CustomFieldValue),
  /// Has to be stored before it becomes a `CustomFieldValue::File`
  Upload(PendingUpload),
}

/// Converts a submitted JSON value to the kind of `field_type`.
pub fn coerce(field_type: FieldType, name: &str, raw: &Value) -> ComflexResult<CoercedValue> {
  let invalid = || ComflexErrorType::InvalidFieldValue(name.to_string());
  let value = match field_type {
    FieldType::Text => CustomFieldValue::Text(scalar_to_string(raw).ok_or_else(invalid)?),
    FieldType::Number => {
      let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
      };
      CustomFieldValue::Number(number.filter(|n| n.is_finite()).ok_or_else(invalid)?)
    }
    FieldType::Date => {
      let raw = raw.as_str().ok_or_else(invalid)?;
      CustomFieldValue::Date(normalize_date(raw).ok_or_else(invalid)?)
    }
    FieldType::Boolean => CustomFieldValue::Boolean(parse_bool(raw).ok_or_else(invalid)?),
    FieldType::Url => {
      let raw = raw.as_str().ok_or_else(invalid)?;
      let url = is_valid_url(raw).map_err(|_| invalid())?;
      CustomFieldValue::Url(url.to_string())
    }
    FieldType::Phone => {
      let raw = raw.as_str().ok_or_else(invalid)?;
      CustomFieldValue::Phone(is_valid_phone(raw).ok_or_else(invalid)?)
    }
    FieldType::Image => match raw {
      Value::String(path) if is_stored_path(path) => CustomFieldValue::File(path.clone()),
      Value::Object(_) => {
        let upload: PendingUpload = serde_json::from_value(raw.clone()).map_err(|_| invalid())?;
        if upload.data.is_empty() {
          Err(invalid())?
        }
        return Ok(CoercedValue::Upload(upload));
      }
      _ => Err(invalid())?,
    },
  };
  Ok(CoercedValue::Value(value))
}

/// Matches submitted values against the form. Keys are compared case-insensitively, unknown keys
/// are ignored, and blank values count as missing.
pub fn collect_submitted(
  form: &[PostingFormField],
  submitted: &Map<String, Value>,
) -> ComflexResult<Vec<(String, CoercedValue)>> {
  let submitted: BTreeMap<String, &Value> = submitted
    .iter()
    .map(|(k, v)| (k.trim().to_lowercase(), v))
    .collect();

  let mut collected = Vec::with_capacity(form.len());
  for field in form {
    match submitted.get(&field.key).filter(|v| !is_blank(v)) {
      Some(raw) => {
        let value = coerce(field.field_type, &field.name, raw)?;
        collected.push((field.key.clone(), value));
      }
      None if field.required => {
        Err(ComflexErrorType::MissingRequiredField(field.name.clone()))?
      }
      None => {}
    }
  }
  Ok(collected)
}

fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.trim().is_empty(),
    _ => false,
  }
}

fn scalar_to_string(raw: &Value) -> Option<String> {
  match raw {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn parse_bool(raw: &Value) -> Option<bool> {
  match raw {
    Value::Bool(b) => Some(*b),
    Value::String(s) => match s.trim().to_lowercase().as_str() {
      "true" | "on" | "yes" | "1" => Some(true),
      "false" | "off" | "no" | "0" => Some(false),
      _ => None,
    },
    _ => None,
  }
}

/// Accepts a plain date, an RFC 3339 timestamp or a local date-time without offset.
fn normalize_date(raw: &str) -> Option<String> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(date.format("%Y-%m-%d").to_string());
  }
  if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
    return Some(
      time
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true),
    );
  }
  ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .map(|time| time.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// A previously stored upload, kept when a posting is modified.
fn is_stored_path(path: &str) -> bool {
  path
    .strip_prefix("postings/")
    .is_some_and(|file| !file.is_empty() && !file.contains(['/', '\\']) && !file.starts_with('.'))
}
