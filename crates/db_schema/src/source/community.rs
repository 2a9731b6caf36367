use crate::newtypes::{CommunityId, PersonId};
use chrono::{DateTime, Utc};
use comflex_db_schema_file::schema::{community, community_member, community_moderator};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Queryable, Selectable, Identifiable)]
#[diesel(table_name = community)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// A community.
pub struct Community {
  pub id: CommunityId,
  pub name: String,
  /// Private communities are only listed to their members.
  pub is_public: bool,
  pub description: String,
  pub owner_id: PersonId,
  pub published_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
  /// Number of members, including the owner.
  pub members: i64,
  pub posts: i64,
  /// Date of the newest posting, if any.
  pub last_post_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, derive_new::new)]
#[derive(Insertable)]
#[diesel(table_name = community)]
pub struct CommunityInsertForm {
  pub name: String,
  pub owner_id: PersonId,
  #[new(default)]
  pub is_public: Option<bool>,
  #[new(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
#[derive(AsChangeset)]
#[diesel(table_name = community)]
pub struct CommunityUpdateForm {
  pub name: Option<String>,
  pub is_public: Option<bool>,
  pub description: Option<String>,
  pub owner_id: Option<PersonId>,
  pub updated_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Identifiable, Queryable, Selectable)]
#[diesel(table_name = community_member)]
#[diesel(primary_key(person_id, community_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommunityMember {
  pub community_id: CommunityId,
  pub person_id: PersonId,
  pub published_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = community_member)]
pub struct CommunityMemberForm {
  pub community_id: CommunityId,
  pub person_id: PersonId,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[derive(Identifiable, Queryable, Selectable)]
#[diesel(table_name = community_moderator)]
#[diesel(primary_key(person_id, community_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommunityModerator {
  pub community_id: CommunityId,
  pub person_id: PersonId,
  pub published_at: DateTime<Utc>,
}

#[derive(Clone, derive_new::new)]
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = community_moderator)]
pub struct CommunityModeratorForm {
  pub community_id: CommunityId,
  pub person_id: PersonId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The relation of a person to one community. Each person holds exactly one role, the owner is
/// never also listed as moderator.
pub enum CommunityRole {
  Owner,
  Moderator,
  Member,
  Outsider,
}
