use crate::newtypes::{CommunityId, PostTypeFieldId, PostTypeId};
use chrono::{DateTime, Utc};
use comflex_db_schema_file::{
  enums::FieldType,
  schema::{post_type, post_type_field},
};
use serde::{Deserialize, Serialize};

/// Fixed field holding the posting name.
pub const TITLE_FIELD: &str = "post title";
/// Fixed field holding the posting description.
pub const DESCRIPTION_FIELD: &str = "description";
pub const FIXED_FIELDS: [&str; 2] = [TITLE_FIELD, DESCRIPTION_FIELD];
/// Name of the post type every new community starts with.
pub const DEFAULT_POST_TYPE_NAME: &str = "Default Post";

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = post_type)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// A named field schema which postings of a community follow.
pub struct PostType {
  pub id: PostTypeId,
  pub community_id: CommunityId,
  pub name: String,
  pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, derive_new::new)]
#[derive(Insertable)]
#[diesel(table_name = post_type)]
pub struct PostTypeInsertForm {
  pub community_id: CommunityId,
  pub name: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = post_type_field)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostTypeField {
  pub id: PostTypeFieldId,
  pub post_type_id: PostTypeId,
  pub name: String,
  pub field_type: FieldType,
  /// Fixed fields can neither be removed nor added a second time.
  pub is_fixed: bool,
  pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, derive_new::new)]
#[derive(Insertable)]
#[diesel(table_name = post_type_field)]
pub struct PostTypeFieldInsertForm {
  pub post_type_id: PostTypeId,
  pub name: String,
  pub field_type: FieldType,
  #[new(default)]
  pub is_fixed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A user supplied field, before it belongs to a post type.
pub struct FieldDefinition {
  pub name: String,
  pub field_type: FieldType,
}
