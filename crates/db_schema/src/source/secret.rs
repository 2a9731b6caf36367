use comflex_db_schema_file::schema::secret;

#[derive(Clone)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = secret)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Generated by the database on the first migration run.
pub struct Secret {
  pub id: i32,
  pub jwt_secret: String,
}
