use crate::newtypes::PersonId;
use chrono::{DateTime, Utc};
use comflex_db_schema_file::schema::person;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = person)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// A registered user.
pub struct Person {
  pub id: PersonId,
  pub name: String,
  #[serde(skip)]
  pub password_encrypted: String,
  pub published_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[derive(Insertable)]
#[diesel(table_name = person)]
pub struct PersonInsertForm {
  pub name: String,
  pub password_encrypted: String,
}
