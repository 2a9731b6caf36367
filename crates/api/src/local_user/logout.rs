use actix_web::{cookie::Cookie, HttpResponse};
use comflex_api_utils::utils::AUTH_COOKIE_NAME;
use comflex_db_views::{api::SuccessResponse, structs::LocalUserView};
use comflex_utils::error::ComflexResult;

/// Tokens are not stored, so logging out only removes the cookie. Clients holding the token
/// elsewhere drop it themselves.
#[tracing::instrument(skip_all)]
pub async fn logout(
  // require login
  _local_user_view: LocalUserView,
) -> ComflexResult<HttpResponse> {
  let mut res = HttpResponse::Ok().json(SuccessResponse::default());
  let mut cookie = Cookie::new(AUTH_COOKIE_NAME, "");
  cookie.set_path("/");
  res.add_removal_cookie(&cookie)?;
  Ok(res)
}
