use crate::structs::LocalUserView;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use comflex_db_schema::{newtypes::PersonId, source::person::Person, utils::DbPool};
use comflex_utils::error::{ComflexError, ComflexErrorType, ComflexResult};
use std::future::{ready, Ready};

impl LocalUserView {
  pub async fn read(pool: &mut DbPool<'_>, person_id: PersonId) -> ComflexResult<Self> {
    let person = Person::read(pool, person_id).await?;
    Ok(Self { person })
  }
}

/// Set by the session middleware for requests with a valid token.
impl FromRequest for LocalUserView {
  type Error = ComflexError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(match req.extensions().get::<LocalUserView>() {
      Some(c) => Ok(c.clone()),
      None => Err(ComflexErrorType::NotLoggedIn.into()),
    })
  }
}
