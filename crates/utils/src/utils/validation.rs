use crate::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

#[allow(clippy::expect_used)]
static VALID_PERSON_NAME_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_@.+-]+$").expect("compile regex"));
// Digits with an optional leading plus, spaces, dashes, dots and parentheses in between.
#[allow(clippy::expect_used)]
static VALID_PHONE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]{3,30}$").expect("compile regex"));
const ALLOWED_URL_SCHEMES: [&str; 2] = ["http", "https"];

const PERSON_NAME_MAX_LENGTH: usize = 150;
const COMMUNITY_NAME_MAX_LENGTH: usize = 120;
const POSTING_NAME_MAX_LENGTH: usize = 120;
const POST_TYPE_NAME_MAX_LENGTH: usize = 100;
const FIELD_NAME_MAX_LENGTH: usize = 100;
const DESCRIPTION_MAX_LENGTH: usize = 10000;
const URL_MAX_LENGTH: usize = 2000;
const PASSWORD_MIN_LENGTH: usize = 10;
const PASSWORD_MAX_LENGTH: usize = 60;

fn has_newline(name: &str) -> bool {
  name.contains('\n')
}

/// Shared rule for every single-line name: trimmed non-empty, bounded, no line breaks.
fn single_line_name_check(
  name: &str,
  max_length: usize,
  error_type: ComflexErrorType,
) -> ComflexResult<()> {
  let length = name.trim().chars().count();
  if length == 0 || length > max_length || has_newline(name) {
    Err(error_type.into())
  } else {
    Ok(())
  }
}

pub fn is_valid_person_name(name: &str) -> ComflexResult<()> {
  min_length_check(name, 1, ComflexErrorType::InvalidName)?;
  max_length_check(name, PERSON_NAME_MAX_LENGTH, ComflexErrorType::InvalidName)?;
  if VALID_PERSON_NAME_REGEX.is_match(name) {
    Ok(())
  } else {
    Err(ComflexErrorType::InvalidName.into())
  }
}

pub fn is_valid_community_name(name: &str) -> ComflexResult<()> {
  single_line_name_check(
    name,
    COMMUNITY_NAME_MAX_LENGTH,
    ComflexErrorType::InvalidCommunityName,
  )
}

pub fn is_valid_posting_name(name: &str) -> ComflexResult<()> {
  single_line_name_check(
    name,
    POSTING_NAME_MAX_LENGTH,
    ComflexErrorType::InvalidPostingName,
  )
}

pub fn is_valid_post_type_name(name: &str) -> ComflexResult<()> {
  single_line_name_check(
    name,
    POST_TYPE_NAME_MAX_LENGTH,
    ComflexErrorType::InvalidPostTypeName,
  )
}

pub fn is_valid_field_name(name: &str) -> ComflexResult<()> {
  single_line_name_check(name, FIELD_NAME_MAX_LENGTH, ComflexErrorType::InvalidFieldName)
}

/// Community and posting descriptions
pub fn description_length_check(description: &str) -> ComflexResult<()> {
  max_length_check(
    description,
    DESCRIPTION_MAX_LENGTH,
    ComflexErrorType::DescriptionTooLong,
  )
}

pub fn password_length_check(pass: &str) -> ComflexResult<()> {
  let len = pass.len();
  if (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len) {
    Ok(())
  } else {
    Err(ComflexErrorType::InvalidPassword.into())
  }
}

/// Parses an absolute http(s) url.
pub fn is_valid_url(raw: &str) -> ComflexResult<Url> {
  max_length_check(raw, URL_MAX_LENGTH, ComflexErrorType::InvalidUrl)?;
  let url = Url::parse(raw.trim()).with_comflex_type(ComflexErrorType::InvalidUrl)?;
  if !ALLOWED_URL_SCHEMES.contains(&url.scheme()) {
    Err(ComflexErrorType::InvalidUrl)?
  }
  Ok(url)
}

/// Checks the phone format and returns the trimmed number.
pub fn is_valid_phone(raw: &str) -> Option<String> {
  let phone = raw.trim();
  let digits = phone.chars().filter(char::is_ascii_digit).count();
  if VALID_PHONE_REGEX.is_match(phone) && digits >= 3 {
    Some(phone.to_string())
  } else {
    None
  }
}

fn max_length_check(
  item: &str,
  max_length: usize,
  max_msg: ComflexErrorType,
) -> ComflexResult<()> {
  let len = item.chars().count();
  if len > max_length {
    Err(max_msg.into())
  } else {
    Ok(())
  }
}

fn min_length_check(
  item: &str,
  min_length: usize,
  min_msg: ComflexErrorType,
) -> ComflexResult<()> {
  let len = item.chars().count();
  if len < min_length {
    Err(min_msg.into())
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_valid_person_name() {
    assert!(is_valid_person_name("hiker_42").is_ok());
    assert!(is_valid_person_name("mary.jane@home").is_ok());
    assert!(is_valid_person_name("").is_err());
    assert!(is_valid_person_name("with space").is_err());
    assert!(is_valid_person_name(&"a".repeat(151)).is_err());
  }

  #[test]
  fn test_valid_community_name() {
    assert!(is_valid_community_name("Hikers").is_ok());
    assert!(is_valid_community_name("Bay Area Hikers & Bikers").is_ok());
    assert!(is_valid_community_name("   ").is_err());
    assert!(is_valid_community_name("two\nlines").is_err());
    assert!(is_valid_community_name(&"x".repeat(121)).is_err());
  }

  #[test]
  fn test_valid_field_and_type_names() {
    assert!(is_valid_field_name("price").is_ok());
    assert!(is_valid_field_name("").is_err());
    assert!(is_valid_post_type_name("Event").is_ok());
    let err = is_valid_post_type_name("").err().map(|e| e.error_type);
    assert_eq!(Some(ComflexErrorType::InvalidPostTypeName), err);
    assert!(is_valid_posting_name("Sunday walk").is_ok());
    assert!(is_valid_posting_name("\n").is_err());
  }

  #[test]
  fn test_description_length() {
    assert!(description_length_check(&"d".repeat(10000)).is_ok());
    let err = description_length_check(&"d".repeat(10001))
      .err()
      .map(|e| e.error_type);
    assert_eq!(Some(ComflexErrorType::DescriptionTooLong), err);
  }

  #[test]
  fn test_password_length() {
    assert!(password_length_check("correct horse").is_ok());
    assert!(password_length_check("short").is_err());
    assert!(password_length_check(&"p".repeat(61)).is_err());
  }

  #[test]
  fn test_valid_url() -> ComflexResult<()> {
    let url = is_valid_url("https://example.com/trail?id=1")?;
    assert_eq!("example.com", url.host_str().unwrap_or_default());
    assert!(is_valid_url("example.com").is_err());
    assert!(is_valid_url("ftp://example.com").is_err());
    assert!(is_valid_url("javascript:alert(1)").is_err());
    Ok(())
  }

  #[test]
  fn test_valid_phone() {
    assert_eq!(
      Some(String::from("+1 (555) 010-9999")),
      is_valid_phone(" +1 (555) 010-9999 ")
    );
    assert_eq!(Some(String::from("5550100")), is_valid_phone("5550100"));
    assert_eq!(None, is_valid_phone("call me"));
    assert_eq!(None, is_valid_phone("--"));
    assert_eq!(None, is_valid_phone("1+2"));
  }
}
