use actix_web::{
  body::MessageBody,
  dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
  http::header::{HeaderValue, CACHE_CONTROL},
  Error,
  HttpMessage,
};
use comflex_api_utils::{context::ComflexContext, utils::read_auth_token};
use comflex_db_schema::newtypes::PersonId;
use comflex_db_views::structs::LocalUserView;
use comflex_utils::{
  claims::Claims,
  error::{ComflexErrorExt2, ComflexErrorType, ComflexResult},
};
use core::future::Ready;
use futures_util::future::LocalBoxFuture;
use std::{future::ready, rc::Rc};
use tracing::debug;

/// Resolves the login token of a request to a `LocalUserView` in the request extensions.
#[derive(Clone)]
pub struct SessionMiddleware {
  context: ComflexContext,
}

impl SessionMiddleware {
  pub fn new(context: ComflexContext) -> Self {
    SessionMiddleware { context }
  }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = SessionService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(SessionService {
      service: Rc::new(service),
      context: self.context.clone(),
    }))
  }
}

pub struct SessionService<S> {
  service: Rc<S>,
  context: ComflexContext,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let svc = self.service.clone();
    let context = self.context.clone();

    Box::pin(async move {
      let jwt = read_auth_token(req.request());

      if let Some(jwt) = &jwt {
        // Invalid tokens are ignored, handlers that need a login answer with not_logged_in
        match local_user_view_from_jwt(jwt, &context).await {
          Ok(local_user_view) => {
            req.extensions_mut().insert(local_user_view);
          }
          Err(e) => debug!("Ignoring auth token: {}", e.error_type),
        }
      }

      let mut res = svc.call(req).await?;

      // Responses for logged in users differ per person
      let cache_value = if jwt.is_some() {
        "private"
      } else {
        "no-cache"
      };
      res
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(cache_value));
      Ok(res)
    })
  }
}

#[tracing::instrument(skip_all)]
async fn local_user_view_from_jwt(
  jwt: &str,
  context: &ComflexContext,
) -> ComflexResult<LocalUserView> {
  let person_id = PersonId(Claims::validate(jwt, &context.secret().jwt_secret)?);
  LocalUserView::read(&mut context.pool(), person_id)
    .await
    .with_comflex_type(ComflexErrorType::NotLoggedIn)
}
