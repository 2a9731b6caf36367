use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::{
  backtrace::Backtrace,
  fmt::{self, Debug},
};
use strum::{Display, EnumIter};

pub type ComflexResult<T> = Result<T, ComflexError>;

#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, EnumIter, Hash)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ComflexErrorType {
  // Authentication
  NotLoggedIn,
  IncorrectLogin,
  PasswordsDoNotMatch,
  /// Password must be between 10 and 60 characters
  InvalidPassword,
  UsernameAlreadyExists,
  InvalidName,
  // Authorization
  NotCommunityOwner,
  NotOwnerOrModerator,
  NotPostingAuthor,
  NotAMember,
  CannotDismissMember,
  OwnerCannotLeave,
  OwnerCannotBeModerator,
  NewOwnerMustBeMember,
  CannotTransferToSelf,
  // Validation
  InvalidCommunityName,
  CommunityAlreadyExists,
  DescriptionTooLong,
  InvalidPostTypeName,
  PostTypeAlreadyExists,
  InvalidFieldName,
  DuplicateFieldName(String),
  FixedFieldCannotBeRemoved,
  FieldNotInPostType,
  InvalidPostingName,
  MissingRequiredField(String),
  InvalidFieldValue(String),
  InvalidUpload,
  UploadTooLarge,
  InvalidUrl,
  ContradictingFilters,
  // Request
  InvalidRequestBody(String),
  InvalidQuery(String),
  RequestTooLarge,
  // Not found
  NotFound,
  CouldntFindCommunity,
  CouldntFindPostType,
  CouldntFindPosting,
  CouldntFindPerson,
  // Storage
  CouldntCreateCommunity,
  CouldntUpdateCommunity,
  CouldntCreatePostType,
  CouldntCreatePosting,
  CouldntUpdatePosting,
  CouldntReactToPosting,
  CouldntStoreUpload,
  CouldntTransferCommunity,
  Unknown(String),
}

impl ComflexErrorType {
  /// Actions attempted by an ineligible user.
  pub fn is_authorization_error(&self) -> bool {
    use ComflexErrorType::*;
    matches!(
      self,
      NotCommunityOwner
        | NotOwnerOrModerator
        | NotPostingAuthor
        | NotAMember
        | CannotDismissMember
        | OwnerCannotLeave
        | OwnerCannotBeModerator
        | NewOwnerMustBeMember
        | CannotTransferToSelf
    )
  }

  pub fn is_not_found_error(&self) -> bool {
    use ComflexErrorType::*;
    matches!(
      self,
      NotFound | CouldntFindCommunity | CouldntFindPostType | CouldntFindPosting | CouldntFindPerson
    )
  }
}

pub struct ComflexError {
  pub error_type: ComflexErrorType,
  pub inner: anyhow::Error,
  pub context: Backtrace,
}

impl<T> From<T> for ComflexError
where
  T: Into<anyhow::Error>,
{
  fn from(t: T) -> Self {
    let cause = t.into();
    let error_type = match cause.downcast_ref::<diesel::result::Error>() {
      Some(&diesel::NotFound) => ComflexErrorType::NotFound,
      _ => ComflexErrorType::Unknown(format!("{}", &cause)),
    };
    ComflexError {
      error_type,
      inner: cause,
      context: Backtrace::capture(),
    }
  }
}

impl Debug for ComflexError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ComflexError")
      .field("message", &self.error_type)
      .field("inner", &self.inner)
      .field("context", &self.context)
      .finish()
  }
}

impl fmt::Display for ComflexError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{}", self.inner)?;
    fmt::Display::fmt(&self.context, f)
  }
}

impl ResponseError for ComflexError {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ComflexErrorType::NotLoggedIn | ComflexErrorType::IncorrectLogin => StatusCode::UNAUTHORIZED,
      ref e if e.is_authorization_error() => StatusCode::FORBIDDEN,
      ref e if e.is_not_found_error() => StatusCode::NOT_FOUND,
      _ => StatusCode::BAD_REQUEST,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(&self.error_type)
  }
}

impl From<ComflexErrorType> for ComflexError {
  fn from(error_type: ComflexErrorType) -> Self {
    let inner = anyhow::anyhow!("{}", error_type);
    ComflexError {
      error_type,
      inner,
      context: Backtrace::capture(),
    }
  }
}

pub trait ComflexErrorExt<T, E: Into<anyhow::Error>> {
  fn with_comflex_type(self, error_type: ComflexErrorType) -> ComflexResult<T>;
}

impl<T, E: Into<anyhow::Error>> ComflexErrorExt<T, E> for Result<T, E> {
  fn with_comflex_type(self, error_type: ComflexErrorType) -> ComflexResult<T> {
    self.map_err(|error| ComflexError {
      error_type,
      inner: error.into(),
      context: Backtrace::capture(),
    })
  }
}

pub trait ComflexErrorExt2<T> {
  fn with_comflex_type(self, error_type: ComflexErrorType) -> ComflexResult<T>;
}

impl<T> ComflexErrorExt2<T> for ComflexResult<T> {
  fn with_comflex_type(self, error_type: ComflexErrorType) -> ComflexResult<T> {
    self.map_err(|mut e| {
      e.error_type = error_type;
      e
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::MessageBody;
  use pretty_assertions::assert_eq;

  #[test]
  fn deserializes_no_message() -> ComflexResult<()> {
    let err = ComflexError::from(ComflexErrorType::OwnerCannotLeave).error_response();
    let json = String::from_utf8(err.into_body().try_into_bytes().unwrap_or_default().to_vec())?;
    assert_eq!(&json, "{\"error\":\"owner_cannot_leave\"}");

    Ok(())
  }

  #[test]
  fn deserializes_with_message() -> ComflexResult<()> {
    let missing = ComflexErrorType::MissingRequiredField(String::from("price"));
    let err = ComflexError::from(missing).error_response();
    let json = String::from_utf8(err.into_body().try_into_bytes().unwrap_or_default().to_vec())?;
    assert_eq!(
      &json,
      "{\"error\":\"missing_required_field\",\"message\":\"price\"}"
    );

    Ok(())
  }

  #[test]
  fn test_convert_diesel_errors() {
    let not_found_error = ComflexError::from(diesel::NotFound);
    assert_eq!(ComflexErrorType::NotFound, not_found_error.error_type);
    assert_eq!(404, not_found_error.status_code());

    let other_error = ComflexError::from(diesel::result::Error::NotInTransaction);
    assert!(matches!(other_error.error_type, ComflexErrorType::Unknown { .. }));
    assert_eq!(400, other_error.status_code());
  }

  #[test]
  fn test_status_codes() {
    let status = |t: ComflexErrorType| ComflexError::from(t).status_code();
    assert_eq!(401, status(ComflexErrorType::NotLoggedIn));
    assert_eq!(403, status(ComflexErrorType::NotCommunityOwner));
    assert_eq!(403, status(ComflexErrorType::CannotDismissMember));
    assert_eq!(404, status(ComflexErrorType::CouldntFindPosting));
    assert_eq!(400, status(ComflexErrorType::InvalidFieldValue("price".into())));
    assert_eq!(400, status(ComflexErrorType::RequestTooLarge));
  }

  #[test]
  fn test_with_comflex_type() {
    let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
    let err = res
      .with_comflex_type(ComflexErrorType::CouldntStoreUpload)
      .err();
    assert_eq!(
      Some(ComflexErrorType::CouldntStoreUpload),
      err.map(|e| e.error_type)
    );
  }
}
