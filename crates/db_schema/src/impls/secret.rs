use crate::{
  source::secret::Secret,
  utils::{get_conn, DbPool},
};
use comflex_db_schema_file::schema::secret;
use diesel::{result::Error, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

impl Secret {
  /// Reads the secrets from the database. Call this once at startup.
  pub async fn init(pool: &mut DbPool<'_>) -> Result<Secret, Error> {
    let conn = &mut get_conn(pool).await?;
    secret::table
      .select(Secret::as_select())
      .first(conn)
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::build_db_pool_for_tests;
  use comflex_utils::error::ComflexResult;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_secret_is_generated() -> ComflexResult<()> {
    let pool = &build_db_pool_for_tests().await;
    let pool = &mut pool.into();

    let first = Secret::init(pool).await?;
    let second = Secret::init(pool).await?;
    assert!(!first.jwt_secret.is_empty());
    assert_ne!("changeme", first.jwt_secret);
    assert_eq!(first.jwt_secret, second.jwt_secret);
    Ok(())
  }
}
