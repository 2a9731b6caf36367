use crate::{
  api::AdvancedSearch,
  community_view::CommunityQuery,
  posting_view::PostingQuery,
  structs::{CommunityView, PostingView},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use comflex_db_schema::{newtypes::PersonId, utils::DbPool};
use comflex_utils::error::{ComflexErrorType, ComflexResult};

/// Start of the given day.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
}

/// Start of the following day, so that the whole given day is included. `None` past the last
/// representable date.
fn day_end(date: NaiveDate) -> Option<DateTime<Utc>> {
  date.succ_opt().map(day_start)
}

fn contradicts<T: PartialOrd>(min: Option<T>, max: Option<T>) -> bool {
  matches!((min, max), (Some(min), Some(max)) if min > max)
}

/// Blank search text is treated like no filter.
fn text_filter(text: &Option<String>) -> Option<String> {
  text
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(ToString::to_string)
}

impl AdvancedSearch {
  pub fn has_community_filters(&self) -> bool {
    text_filter(&self.community_name).is_some()
      || text_filter(&self.community_description).is_some()
      || self.created_after.is_some()
      || self.created_before.is_some()
      || self.min_members.is_some()
      || self.max_members.is_some()
      || self.min_posts.is_some()
      || self.max_posts.is_some()
  }

  pub fn has_posting_filters(&self) -> bool {
    text_filter(&self.posting_name).is_some()
      || text_filter(&self.posting_description).is_some()
      || self.posted_after.is_some()
      || self.posted_before.is_some()
      || self.min_likes.is_some()
      || self.max_likes.is_some()
  }

  /// Rejects ranges whose lower bound lies above the upper bound.
  pub fn check(&self) -> ComflexResult<()> {
    if contradicts(self.created_after, self.created_before)
      || contradicts(self.min_members, self.max_members)
      || contradicts(self.min_posts, self.max_posts)
      || contradicts(self.posted_after, self.posted_before)
      || contradicts(self.min_likes, self.max_likes)
    {
      Err(ComflexErrorType::ContradictingFilters)?
    }
    Ok(())
  }

  pub fn community_query(&self, my_person_id: Option<PersonId>) -> CommunityQuery {
    CommunityQuery {
      my_person_id,
      name_contains: text_filter(&self.community_name),
      description_contains: text_filter(&self.community_description),
      created_after: self.created_after.map(day_start),
      created_before: self.created_before.and_then(day_end),
      min_members: self.min_members,
      max_members: self.max_members,
      min_posts: self.min_posts,
      max_posts: self.max_posts,
      page: self.page,
      limit: self.limit,
      ..Default::default()
    }
  }

  pub fn posting_query(&self, my_person_id: Option<PersonId>) -> PostingQuery {
    PostingQuery {
      my_person_id,
      name_contains: text_filter(&self.posting_name),
      description_contains: text_filter(&self.posting_description),
      posted_after: self.posted_after.map(day_start),
      posted_before: self.posted_before.and_then(day_end),
      min_likes: self.min_likes,
      max_likes: self.max_likes,
      page: self.page,
      limit: self.limit,
      ..Default::default()
    }
  }

  /// Runs both searches. A kind without filters yields nothing.
  pub async fn run(
    &self,
    pool: &mut DbPool<'_>,
    my_person_id: Option<PersonId>,
  ) -> ComflexResult<(Vec<CommunityView>, Vec<PostingView>)> {
    self.check()?;
    let communities = if self.has_community_filters() {
      self.community_query(my_person_id).list(pool).await?
    } else {
      vec![]
    };
    let postings = if self.has_posting_filters() {
      self.posting_query(my_person_id).list(pool).await?
    } else {
      vec![]
    };
    Ok((communities, postings))
  }
}
