use crate::{
  newtypes::PersonId,
  source::person::{Person, PersonInsertForm},
  utils::{functions::lower, get_conn, DbPool},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use comflex_db_schema_file::schema::person;
use comflex_utils::error::{ComflexErrorType, ComflexResult};
use diesel::{
  dsl::insert_into,
  result::{DatabaseErrorKind, Error},
  ExpressionMethods,
  OptionalExtension,
  QueryDsl,
};
use diesel_async::RunQueryDsl;

impl Person {
  /// Creates a person, storing only the bcrypt hash of `password`.
  pub async fn register(pool: &mut DbPool<'_>, name: &str, password: &str) -> ComflexResult<Self> {
    let password = password.to_string();
    let password_encrypted =
      tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST)).await??;
    let form = PersonInsertForm::new(name.to_string(), password_encrypted);

    let conn = &mut get_conn(pool).await?;
    let inserted = insert_into(person::table)
      .values(form)
      .get_result::<Self>(conn)
      .await;
    match inserted {
      Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
        Err(ComflexErrorType::UsernameAlreadyExists.into())
      }
      res => Ok(res?),
    }
  }

  pub async fn read(pool: &mut DbPool<'_>, person_id: PersonId) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    person::table.find(person_id).first(conn).await
  }

  /// Names are matched case-insensitively.
  pub async fn read_from_name(pool: &mut DbPool<'_>, name: &str) -> Result<Option<Self>, Error> {
    let conn = &mut get_conn(pool).await?;
    person::table
      .filter(lower(person::name).eq(name.to_lowercase()))
      .first(conn)
      .await
      .optional()
  }

  pub async fn delete(pool: &mut DbPool<'_>, person_id: PersonId) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(person::table.find(person_id))
      .execute(conn)
      .await
  }

  pub fn verify_password(&self, password: &str) -> bool {
    verify(password, &self.password_encrypted).unwrap_or(false)
  }
}
