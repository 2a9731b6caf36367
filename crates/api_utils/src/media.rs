use base64::{engine::general_purpose::STANDARD, Engine};
use comflex_db_schema::custom_fields::{
  collect_submitted,
  CoercedValue,
  CustomFieldValue,
  CustomFields,
  PendingUpload,
  PostingFormField,
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  settings::structs::Settings,
};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path};
use tracing::{info, warn};
use uuid::Uuid;

/// Uploads are stored below this directory of `media_dir`.
pub const POSTINGS_DIR: &str = "postings";

/// Lowercase alphanumeric extension of an uploaded file name, at most 10 characters.
pub fn sanitize_extension(file_name: &str) -> Option<String> {
  let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
  let valid = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
  valid.then_some(ext)
}

/// Writes an upload to `media_dir` and returns the path to store in the posting.
#[tracing::instrument(skip_all)]
pub async fn store_upload(upload: &PendingUpload, settings: &Settings) -> ComflexResult<String> {
  let data = STANDARD
    .decode(upload.data.trim())
    .with_comflex_type(ComflexErrorType::InvalidUpload)?;
  if data.is_empty() {
    Err(ComflexErrorType::InvalidUpload)?
  }
  if data.len() > settings.max_upload_size {
    Err(ComflexErrorType::UploadTooLarge)?
  }

  let file_name = match sanitize_extension(&upload.file_name) {
    Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
    None => Uuid::new_v4().to_string(),
  };
  let dir = Path::new(&settings.media_dir).join(POSTINGS_DIR);
  tokio::fs::create_dir_all(&dir)
    .await
    .with_comflex_type(ComflexErrorType::CouldntStoreUpload)?;
  tokio::fs::write(dir.join(&file_name), &data)
    .await
    .with_comflex_type(ComflexErrorType::CouldntStoreUpload)?;

  info!("Stored upload {} ({} bytes)", file_name, data.len());
  Ok(format!("{POSTINGS_DIR}/{file_name}"))
}

/// Validates submitted custom values against a posting form and stores any uploads. The result
/// is what gets saved with the posting.
pub async fn collect_custom_fields(
  form: &[PostingFormField],
  submitted: &Map<String, Value>,
  settings: &Settings,
) -> ComflexResult<CustomFields> {
  let mut fields = BTreeMap::new();
  for (key, value) in collect_submitted(form, submitted)? {
    let value = match value {
      CoercedValue::Value(v) => v,
      CoercedValue::Upload(upload) => match store_upload(&upload, settings).await {
        Ok(path) => CustomFieldValue::File(path),
        Err(e) => {
          remove_stored_files(&CustomFields(fields).stored_files(), settings).await;
          return Err(e);
        }
      },
    };
    fields.insert(key, value);
  }
  Ok(CustomFields(fields))
}

/// Deletes uploads from `media_dir`. Paths that were not written by `store_upload` are skipped,
/// and failures are only logged.
#[tracing::instrument(skip(settings))]
pub async fn remove_stored_files(paths: &[String], settings: &Settings) {
  let media_dir = Path::new(&settings.media_dir);
  for path in paths {
    let stored_name = path
      .strip_prefix(&format!("{POSTINGS_DIR}/"))
      .filter(|name| Path::new(name).file_name().and_then(|n| n.to_str()) == Some(*name));
    let Some(stored_name) = stored_name else {
      warn!("Not removing {}, it is not a stored upload", path);
      continue;
    };
    match tokio::fs::remove_file(media_dir.join(POSTINGS_DIR).join(stored_name)).await {
      Ok(()) => info!("Removed upload {}", path),
      Err(e) => warn!("Couldn't remove upload {}: {}", path, e),
    }
  }
}

/// Files referenced by `old` that `new` no longer refers to.
pub fn replaced_files(old: &CustomFields, new: &CustomFields) -> Vec<String> {
  let kept = new.stored_files();
  old
    .stored_files()
    .into_iter()
    .filter(|path| !kept.contains(path))
    .collect()
}
