use crate::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// person_id, standard claim by RFC 7519.
  pub sub: String,
  pub iss: String,
  /// Time when this token was issued as UNIX-timestamp in seconds
  pub iat: i64,
}

impl Claims {
  /// Returns the person id stored in the token.
  pub fn validate(jwt: &str, jwt_secret: &str) -> ComflexResult<i32> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.remove("exp");
    let key = DecodingKey::from_secret(jwt_secret.as_ref());
    let claims =
      decode::<Claims>(jwt, &key, &validation).with_comflex_type(ComflexErrorType::NotLoggedIn)?;
    claims
      .claims
      .sub
      .parse()
      .with_comflex_type(ComflexErrorType::NotLoggedIn)
  }

  pub fn generate(person_id: i32, hostname: &str, jwt_secret: &str) -> ComflexResult<String> {
    let my_claims = Claims {
      sub: person_id.to_string(),
      iss: hostname.to_string(),
      iat: Utc::now().timestamp(),
    };
    let key = EncodingKey::from_secret(jwt_secret.as_ref());
    Ok(encode(&Header::default(), &my_claims, &key)?)
  }
}
