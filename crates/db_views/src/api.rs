use crate::structs::{CommunityView, PostTypeView, PostingView};
use chrono::NaiveDate;
use comflex_db_schema::{
  custom_fields::PostingFormField,
  newtypes::{CommunityId, PersonId, PostTypeFieldId, PostTypeId, PostingId},
  source::{person::Person, post_type::FieldDefinition, post_type::PostType},
  CommunitySortType,
  FieldType,
  PostingSortType,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SuccessResponse {
  pub success: bool,
}

impl Default for SuccessResponse {
  fn default() -> Self {
    SuccessResponse { success: true }
  }
}

// Users

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Register a new user.
pub struct Register {
  pub username: String,
  pub password: String,
  pub password_verify: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Logging into comflex.
pub struct Login {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
/// A response for your login. The token is also set as `jwt` cookie.
pub struct LoginResponse {
  pub jwt: String,
  pub person: Person,
}

// Communities

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Create a community. The creator becomes its owner.
pub struct CreateCommunity {
  pub name: String,
  /// Defaults to true.
  pub is_public: Option<bool>,
  pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommunityResponse {
  pub community_view: CommunityView,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GetCommunity {
  pub id: CommunityId,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone)]
/// The community page. Postings and the most liked posting stay empty for readers who may not see
/// a private community.
pub struct GetCommunityResponse {
  pub community_view: CommunityView,
  pub post_types: Vec<PostTypeView>,
  pub moderators: Vec<Person>,
  pub postings: Vec<PostingView>,
  pub most_liked: Option<PostingView>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct ListCommunities {
  pub sort: Option<CommunitySortType>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListCommunitiesResponse {
  pub communities: Vec<CommunityView>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Edit a community. Only the owner may do this.
pub struct EditCommunity {
  pub community_id: CommunityId,
  pub name: Option<String>,
  pub is_public: Option<bool>,
  pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct DeleteCommunity {
  pub community_id: CommunityId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct JoinCommunity {
  pub community_id: CommunityId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct LeaveCommunity {
  pub community_id: CommunityId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
/// Add or remove a moderator.
pub struct AddModToCommunity {
  pub community_id: CommunityId,
  pub person_id: PersonId,
  pub added: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddModToCommunityResponse {
  pub moderators: Vec<Person>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
/// Remove a member from a community.
pub struct DismissMember {
  pub community_id: CommunityId,
  pub person_id: PersonId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
/// Hand the community over to another member.
pub struct TransferCommunity {
  pub community_id: CommunityId,
  pub person_id: PersonId,
}

// Post types

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Create a post type. The title and description fields are added automatically.
pub struct CreatePostType {
  pub community_id: CommunityId,
  pub name: String,
  #[serde(default)]
  pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostTypeResponse {
  pub post_type_view: PostTypeView,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct ListPostTypes {
  pub community_id: CommunityId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListPostTypesResponse {
  pub post_types: Vec<PostTypeView>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct GetPostingForm {
  pub post_type_id: PostTypeId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
/// The inputs needed to submit a posting of one post type.
pub struct GetPostingFormResponse {
  pub post_type: PostType,
  pub fields: Vec<PostingFormField>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct DeletePostType {
  pub post_type_id: PostTypeId,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddPostTypeField {
  pub post_type_id: PostTypeId,
  pub name: String,
  pub field_type: FieldType,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct RemovePostTypeField {
  pub field_id: PostTypeFieldId,
}

// Postings

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Create a posting. `custom_fields` is keyed by field name, matched case-insensitively.
pub struct CreatePosting {
  pub post_type_id: PostTypeId,
  pub name: String,
  pub description: Option<String>,
  pub custom_fields: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostingResponse {
  pub posting_view: PostingView,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct GetPosting {
  pub id: PostingId,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct ListPostings {
  pub community_id: Option<CommunityId>,
  pub post_type_id: Option<PostTypeId>,
  pub sort: Option<PostingSortType>,
  /// Only postings written by the requester
  pub mine: Option<bool>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListPostingsResponse {
  pub postings: Vec<PostingView>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Edit a posting. Custom fields, when given, replace the stored ones entirely.
pub struct EditPosting {
  pub posting_id: PostingId,
  pub name: Option<String>,
  pub description: Option<String>,
  pub custom_fields: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct DeletePosting {
  pub posting_id: PostingId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
/// Like or dislike a posting. Sending the current reaction again takes it back.
pub struct ReactToPosting {
  pub posting_id: PostingId,
}

// Search

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
/// Search communities by name.
pub struct Search {
  pub q: String,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResponse {
  pub communities: Vec<CommunityView>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
/// Independent filters for communities and postings. A kind without any filter set is not
/// searched. Dates are inclusive.
pub struct AdvancedSearch {
  pub community_name: Option<String>,
  pub community_description: Option<String>,
  pub created_after: Option<NaiveDate>,
  pub created_before: Option<NaiveDate>,
  pub min_members: Option<i64>,
  pub max_members: Option<i64>,
  pub min_posts: Option<i64>,
  pub max_posts: Option<i64>,
  pub posting_name: Option<String>,
  pub posting_description: Option<String>,
  pub posted_after: Option<NaiveDate>,
  pub posted_before: Option<NaiveDate>,
  pub min_likes: Option<i64>,
  pub max_likes: Option<i64>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdvancedSearchResponse {
  pub communities: Vec<CommunityView>,
  pub postings: Vec<PostingView>,
}
