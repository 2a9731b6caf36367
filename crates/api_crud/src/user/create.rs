use actix_web::{
  web::{Data, Json},
  HttpResponse,
};
use comflex_api_utils::{context::ComflexContext, utils::create_login_cookie};
use comflex_db_schema::source::person::Person;
use comflex_db_views::api::{LoginResponse, Register};
use comflex_utils::{
  claims::Claims,
  error::{ComflexErrorType, ComflexResult},
  utils::validation::{is_valid_person_name, password_length_check},
};
use tracing::info;

/// Creates an account and logs it in right away.
#[tracing::instrument(skip_all)]
pub async fn register(
  data: Json<Register>,
  context: Data<ComflexContext>,
) -> ComflexResult<HttpResponse> {
  let username = data.username.trim();
  is_valid_person_name(username)?;
  password_length_check(&data.password)?;
  if data.password != data.password_verify {
    Err(ComflexErrorType::PasswordsDoNotMatch)?
  }
  if Person::read_from_name(&mut context.pool(), username)
    .await?
    .is_some()
  {
    Err(ComflexErrorType::UsernameAlreadyExists)?
  }

  let person = Person::register(&mut context.pool(), username, &data.password).await?;
  info!("Registered {} ({})", person.name, person.id);

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
