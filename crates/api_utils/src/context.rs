use comflex_db_schema::{
  source::secret::Secret,
  utils::{build_db_pool_for_tests, ActualDbPool, DbPool},
};
use comflex_utils::settings::{structs::Settings, SETTINGS};
use std::sync::Arc;

#[derive(Clone)]
pub struct ComflexContext {
  pool: ActualDbPool,
  secret: Arc<Secret>,
}

impl ComflexContext {
  pub fn create(pool: ActualDbPool, secret: Secret) -> ComflexContext {
    ComflexContext {
      pool,
      secret: Arc::new(secret),
    }
  }
  pub fn pool(&self) -> DbPool<'_> {
    DbPool::Pool(&self.pool)
  }
  pub fn settings(&self) -> &'static Settings {
    &SETTINGS
  }
  pub fn secret(&self) -> &Secret {
    &self.secret
  }

  /// Initialize a context for use in tests, with migrations applied.
  ///
  /// Do not use this in production code.
  #[allow(clippy::expect_used)]
  pub async fn init_test_context() -> ComflexContext {
    let pool = build_db_pool_for_tests().await;
    let secret = Secret::init(&mut (&pool).into())
      .await
      .expect("secret missing");
    ComflexContext::create(pool, secret)
  }
}
