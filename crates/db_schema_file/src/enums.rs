use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
  EnumString,
  Display,
  EnumIter,
  Debug,
  Serialize,
  Deserialize,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Hash,
  DbEnum,
)]
#[ExistingTypePath = "crate::schema::sql_types::FieldTypeEnum"]
#[DbValueStyle = "verbatim"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
/// The value kind of a post type field.
pub enum FieldType {
  #[default]
  Text,
  Number,
  Date,
  Boolean,
  Image,
  Url,
  Phone,
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
/// Orderings for community lists.
pub enum CommunitySortType {
  /// Creation date, newest first
  #[default]
  New,
  /// Date of the latest posting, communities without postings are left out
  RecentlyActive,
  MostMembers,
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
/// Orderings for posting lists.
pub enum PostingSortType {
  #[default]
  New,
  /// Like count, ties broken by date
  MostLiked,
}
