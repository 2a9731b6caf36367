use comflex_utils::{
  error::ComflexResult,
  settings::SETTINGS,
  FETCH_LIMIT_DEFAULT,
  FETCH_LIMIT_MAX,
};
use diesel::result::Error::{self as DieselError, QueryBuilderError};
use diesel_async::{
  pg::AsyncPgConnection,
  pooled_connection::{
    deadpool::{Object as PooledConnection, Pool},
    AsyncDieselConnectionManager,
  },
};
use std::ops::{Deref, DerefMut};
use tracing::info;

pub type ActualDbPool = Pool<AsyncPgConnection>;

/// References a pool or connection. Functions must take `&mut DbPool<'_>` to allow implicit
/// reborrowing.
///
/// https://github.com/rust-lang/rfcs/issues/1403
pub enum DbPool<'a> {
  Pool(&'a ActualDbPool),
  Conn(&'a mut AsyncPgConnection),
}

pub enum DbConn<'a> {
  Pool(PooledConnection<AsyncPgConnection>),
  Conn(&'a mut AsyncPgConnection),
}

pub async fn get_conn<'a, 'b: 'a>(pool: &'a mut DbPool<'b>) -> Result<DbConn<'a>, DieselError> {
  Ok(match pool {
    DbPool::Pool(pool) => DbConn::Pool(pool.get().await.map_err(|e| QueryBuilderError(e.into()))?),
    DbPool::Conn(conn) => DbConn::Conn(conn),
  })
}

impl Deref for DbConn<'_> {
  type Target = AsyncPgConnection;

  fn deref(&self) -> &Self::Target {
    match self {
      DbConn::Pool(conn) => conn.deref(),
      DbConn::Conn(conn) => conn.deref(),
    }
  }
}

impl DerefMut for DbConn<'_> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    match self {
      DbConn::Pool(conn) => conn.deref_mut(),
      DbConn::Conn(conn) => conn.deref_mut(),
    }
  }
}

// Allows functions that take `DbPool<'_>` to be called in a transaction by passing `&mut
// conn.into()`
impl<'a> From<&'a mut AsyncPgConnection> for DbPool<'a> {
  fn from(value: &'a mut AsyncPgConnection) -> Self {
    DbPool::Conn(value)
  }
}

impl<'a, 'b: 'a> From<&'a mut DbConn<'b>> for DbPool<'a> {
  fn from(value: &'a mut DbConn<'b>) -> Self {
    DbPool::Conn(value.deref_mut())
  }
}

impl<'a> From<&'a ActualDbPool> for DbPool<'a> {
  fn from(value: &'a ActualDbPool) -> Self {
    DbPool::Pool(value)
  }
}

/// Escapes the LIKE wildcards in `q` and wraps it for a substring match.
pub fn fuzzy_search(q: &str) -> String {
  let replaced = q
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{replaced}%")
}

pub fn limit_and_offset(
  page: Option<i64>,
  limit: Option<i64>,
) -> Result<(i64, i64), diesel::result::Error> {
  let page = match page {
    Some(page) => {
      if page < 1 {
        return Err(QueryBuilderError("Page is < 1".into()));
      }
      page
    }
    None => 1,
  };
  let limit = match limit {
    Some(limit) => {
      if !(1..=FETCH_LIMIT_MAX).contains(&limit) {
        return Err(QueryBuilderError(
          format!("Fetch limit is > {FETCH_LIMIT_MAX}").into(),
        ));
      }
      limit
    }
    None => FETCH_LIMIT_DEFAULT,
  };
  let offset = limit
    .checked_mul(page - 1)
    .ok_or_else(|| QueryBuilderError("Page is too large".into()))?;
  Ok((limit, offset))
}

pub async fn build_db_pool() -> ComflexResult<ActualDbPool> {
  let db_url = SETTINGS.get_database_url();
  let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&db_url);
  let pool = Pool::builder(manager)
    .max_size(SETTINGS.database.pool_size)
    .build()?;

  comflex_db_schema_file::schema_setup::run(&db_url)?;
  info!("Database pool ready");

  Ok(pool)
}

#[allow(clippy::expect_used)]
pub async fn build_db_pool_for_tests() -> ActualDbPool {
  build_db_pool().await.expect("db pool missing")
}

pub mod functions {
  use diesel::sql_types::Text;

  define_sql_function!(fn lower(x: Text) -> Text);
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_fuzzy_search() {
    let test = "This %is% _a_ fuzzy search";
    assert_eq!(
      fuzzy_search(test),
      "%This \\%is\\% \\_a\\_ fuzzy search%".to_string()
    );
  }

  #[test]
  fn test_limit_and_offset() -> Result<(), DieselError> {
    assert_eq!((FETCH_LIMIT_DEFAULT, 0), limit_and_offset(None, None)?);
    assert_eq!((10, 20), limit_and_offset(Some(3), Some(10))?);
    assert!(limit_and_offset(Some(0), None).is_err());
    assert!(limit_and_offset(None, Some(FETCH_LIMIT_MAX + 1)).is_err());
    assert!(limit_and_offset(Some(i64::MAX), None).is_err());
    assert!(limit_and_offset(Some(i64::MAX), Some(1)).is_ok());
    Ok(())
  }
}
