use comflex_db_schema::{
  custom_fields::CustomFields,
  source::{
    community::{Community, CommunityRole},
    person::Person,
    post_type::{PostType, PostTypeField},
    posting::{Posting, Reaction},
  },
};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
/// A community with its owner, as seen by one person.
pub struct CommunityView {
  pub community: Community,
  pub owner: Person,
  /// `Outsider` for anonymous requests.
  pub my_role: CommunityRole,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
/// A posting with the rows it refers to and its decoded custom values.
pub struct PostingView {
  pub posting: Posting,
  pub creator: Person,
  pub community: Community,
  pub post_type: PostType,
  pub custom_fields: CustomFields,
  pub my_reaction: Option<Reaction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
/// A post type with its fields in schema order.
pub struct PostTypeView {
  pub post_type: PostType,
  pub fields: Vec<PostTypeField>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
/// The logged in user, taken from request extensions.
pub struct LocalUserView {
  pub person: Person,
}
