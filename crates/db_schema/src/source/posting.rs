use crate::newtypes::{CommunityId, PersonId, PostTypeId, PostingId};
use chrono::{DateTime, Utc};
use comflex_db_schema_file::schema::{posting, posting_reaction};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = posting)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// A posting, following the schema of its post type.
pub struct Posting {
  pub id: PostingId,
  pub community_id: CommunityId,
  pub post_type_id: PostTypeId,
  pub creator_id: PersonId,
  pub name: String,
  pub description: String,
  /// Encoded `CustomFields`, use `CustomFields::decode` to read it.
  #[serde(skip)]
  pub custom_fields: String,
  pub published_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
  pub likes: i64,
  pub dislikes: i64,
}

#[derive(Debug, Clone, derive_new::new)]
#[derive(Insertable)]
#[diesel(table_name = posting)]
pub struct PostingInsertForm {
  pub community_id: CommunityId,
  pub post_type_id: PostTypeId,
  pub creator_id: PersonId,
  pub name: String,
  #[new(default)]
  pub description: Option<String>,
  #[new(default)]
  pub custom_fields: Option<String>,
}

#[derive(Debug, Clone, Default)]
#[derive(AsChangeset)]
#[diesel(table_name = posting)]
pub struct PostingUpdateForm {
  pub name: Option<String>,
  pub description: Option<String>,
  pub custom_fields: Option<String>,
  pub updated_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
  Like,
  Dislike,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Identifiable, Queryable, Selectable)]
#[diesel(table_name = posting_reaction)]
#[diesel(primary_key(person_id, posting_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostingReaction {
  pub posting_id: PostingId,
  pub person_id: PersonId,
  /// 1 for a like, -1 for a dislike
  pub score: i16,
  pub published_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = posting_reaction)]
pub struct PostingReactionForm {
  pub posting_id: PostingId,
  pub person_id: PersonId,
  pub score: i16,
}
