use actix_web::{
  web::{Data, Json},
  HttpResponse,
};
use comflex_api_utils::{context::ComflexContext, utils::create_login_cookie};
use comflex_db_schema::source::person::Person;
use comflex_db_views::api::{Login, LoginResponse};
use comflex_utils::{
  claims::Claims,
  error::{ComflexErrorType, ComflexResult},
};

/// Checks the credentials and hands out a token, both in the body and as `auth` cookie.
#[tracing::instrument(skip_all)]
pub async fn login(
  data: Json<Login>,
  context: Data<ComflexContext>,
) -> ComflexResult<HttpResponse> {
  let person = Person::read_from_name(&mut context.pool(), data.username.trim())
    .await?
    .ok_or(ComflexErrorType::IncorrectLogin)?;
  if !person.verify_password(&data.password) {
    Err(ComflexErrorType::IncorrectLogin)?
  }

  let jwt = Claims::generate(
    person.id.0,
    &context.settings().hostname,
    &context.secret().jwt_secret,
  )?;

  let mut res = HttpResponse::Ok().json(LoginResponse {
    jwt: jwt.clone(),
    person,
  });
  res.add_cookie(&create_login_cookie(jwt))?;
  Ok(res)
}
