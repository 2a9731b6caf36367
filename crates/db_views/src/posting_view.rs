use crate::structs::PostingView;
use chrono::{DateTime, Utc};
use comflex_db_schema::{
  newtypes::{CommunityId, PersonId, PostTypeId, PostingId},
  source::{
    community::Community,
    person::Person,
    post_type::PostType,
    posting::{Posting, Reaction},
  },
  traits::JoinView,
  utils::{fuzzy_search, get_conn, limit_and_offset, DbPool},
  PostingSortType,
};
use comflex_db_schema_file::schema::{
  community,
  community_member,
  person,
  post_type,
  posting,
  posting_reaction,
};
use diesel::{
  debug_query,
  pg::Pg,
  result::Error,
  BoolExpressionMethods,
  ExpressionMethods,
  JoinOnDsl,
  NullableExpressionMethods,
  PgTextExpressionMethods,
  QueryDsl,
  SelectableHelper,
};
use diesel_async::RunQueryDsl;
use tracing::debug;

type PostingViewTuple = (Posting, Person, Community, PostType, Option<i16>);

impl PostingView {
  #[diesel::dsl::auto_type(no_type_alias)]
  fn joins(my_person_id: Option<PersonId>) -> _ {
    let reaction_join = posting_reaction::table.on(
      posting_reaction::posting_id
        .eq(posting::id)
        .and(posting_reaction::person_id.nullable().eq(my_person_id)),
    );
    let member_join = community_member::table.on(
      community_member::community_id
        .eq(posting::community_id)
        .and(community_member::person_id.nullable().eq(my_person_id)),
    );

    posting::table
      .inner_join(person::table)
      .inner_join(community::table)
      .inner_join(post_type::table)
      .left_join(reaction_join)
      .left_join(member_join)
  }

  pub async fn read(
    pool: &mut DbPool<'_>,
    posting_id: PostingId,
    my_person_id: Option<PersonId>,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    let res = Self::joins(my_person_id)
      .filter(posting::id.eq(posting_id))
      .select((
        Posting::as_select(),
        Person::as_select(),
        Community::as_select(),
        PostType::as_select(),
        posting_reaction::score.nullable(),
      ))
      .first::<PostingViewTuple>(conn)
      .await?;
    Ok(Self::from_tuple(res))
  }

  /// The posting with the most likes in a community, newest first on ties.
  pub async fn most_liked(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    my_person_id: Option<PersonId>,
  ) -> Result<Option<Self>, Error> {
    let mut top = PostingQuery {
      sort: Some(PostingSortType::MostLiked),
      community_id: Some(community_id),
      my_person_id,
      limit: Some(1),
      ..Default::default()
    }
    .list(pool)
    .await?;
    Ok(top.pop())
  }
}

#[derive(Default, Clone, Debug)]
pub struct PostingQuery {
  pub sort: Option<PostingSortType>,
  pub my_person_id: Option<PersonId>,
  pub community_id: Option<CommunityId>,
  pub post_type_id: Option<PostTypeId>,
  pub creator_id: Option<PersonId>,
  pub name_contains: Option<String>,
  pub description_contains: Option<String>,
  pub posted_after: Option<DateTime<Utc>>,
  pub posted_before: Option<DateTime<Utc>>,
  pub min_likes: Option<i64>,
  pub max_likes: Option<i64>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

impl PostingQuery {
  pub async fn list(self, pool: &mut DbPool<'_>) -> Result<Vec<PostingView>, Error> {
    let o = self;
    let conn = &mut get_conn(pool).await?;

    let mut query = PostingView::joins(o.my_person_id)
      .select((
        Posting::as_select(),
        Person::as_select(),
        Community::as_select(),
        PostType::as_select(),
        posting_reaction::score.nullable(),
      ))
      .into_boxed();

    // Postings of private communities are shown to members only
    query = query.filter(
      community::is_public
        .eq(true)
        .or(community_member::person_id.nullable().is_not_null()),
    );

    if let Some(community_id) = o.community_id {
      query = query.filter(posting::community_id.eq(community_id));
    }
    if let Some(post_type_id) = o.post_type_id {
      query = query.filter(posting::post_type_id.eq(post_type_id));
    }
    if let Some(creator_id) = o.creator_id {
      query = query.filter(posting::creator_id.eq(creator_id));
    }
    if let Some(name) = &o.name_contains {
      query = query.filter(posting::name.ilike(fuzzy_search(name)));
    }
    if let Some(description) = &o.description_contains {
      query = query.filter(posting::description.ilike(fuzzy_search(description)));
    }
    if let Some(after) = o.posted_after {
      query = query.filter(posting::published_at.ge(after));
    }
    if let Some(before) = o.posted_before {
      query = query.filter(posting::published_at.lt(before));
    }
    if let Some(min) = o.min_likes {
      query = query.filter(posting::likes.ge(min));
    }
    if let Some(max) = o.max_likes {
      query = query.filter(posting::likes.le(max));
    }

    query = match o.sort.unwrap_or_default() {
      PostingSortType::New => query.order_by(posting::published_at.desc()),
      PostingSortType::MostLiked => query
        .order_by(posting::likes.desc())
        .then_order_by(posting::published_at.desc()),
    };
    query = query.then_order_by(posting::id.desc());

    let (limit, offset) = limit_and_offset(o.page, o.limit)?;
    query = query.limit(limit).offset(offset);

    debug!("Posting Query: {:?}", debug_query::<Pg, _>(&query));

    let res = query.load::<PostingViewTuple>(conn).await?;
    Ok(res.into_iter().map(PostingView::from_tuple).collect())
  }
}

impl JoinView for PostingView {
  type JoinTuple = PostingViewTuple;
  fn from_tuple(a: Self::JoinTuple) -> Self {
    let (posting, creator, community, post_type, score) = a;
    let custom_fields = posting.custom_fields();
    Self {
      posting,
      creator,
      community,
      post_type,
      custom_fields,
      my_reaction: score.and_then(Reaction::from_score),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use comflex_db_schema::{
    custom_fields::{CustomFieldValue, CustomFields},
    source::{
      community::{CommunityInsertForm, CommunityMember, CommunityMemberForm},
      posting::{PostingInsertForm, PostingReaction},
    },
    traits::{Crud, Joinable},
    utils::build_db_pool_for_tests,
  };
  use comflex_utils::error::ComflexResult;
  use pretty_assertions::assert_eq;
  use serial_test::serial;
  use std::collections::BTreeMap;

  #[tokio::test]
  #[serial]
  async fn test_most_liked_and_filters() -> ComflexResult<()> {
    let pool = &build_db_pool_for_tests().await;
    let pool = &mut pool.into();

    let owner = Person::register(pool, "posting_owner", "posting_password").await?;
    let fan = Person::register(pool, "posting_fan", "posting_password").await?;
    let mut form = CommunityInsertForm::new("posting_view_community".into(), owner.id);
    form.is_public = Some(false);
    let community = Community::create_with_owner(pool, &form).await?;
    CommunityMember::join(pool, &CommunityMemberForm::new(community.id, fan.id)).await?;
    let post_type = PostType::list_for_community(pool, community.id)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::NotFound)?;

    let mut map = BTreeMap::new();
    map.insert("price".to_string(), CustomFieldValue::Number(5.0));
    let custom = CustomFields(map);
    let mut first_form =
      PostingInsertForm::new(community.id, post_type.id, owner.id, "First".into());
    first_form.custom_fields = Some(custom.encode()?);
    let first = Posting::create(pool, &first_form).await?;
    let second = Posting::create(
      pool,
      &PostingInsertForm::new(community.id, post_type.id, owner.id, "Second".into()),
    )
    .await?;

    PostingReaction::react(pool, first.id, fan.id, Reaction::Like).await?;

    let newest = PostingQuery {
      community_id: Some(community.id),
      my_person_id: Some(fan.id),
      ..Default::default()
    }
    .list(pool)
    .await?;
    let ids: Vec<_> = newest.iter().map(|p| p.posting.id).collect();
    assert_eq!(vec![second.id, first.id], ids);

    let top = PostingView::most_liked(pool, community.id, Some(fan.id))
      .await?
      .ok_or(Error::NotFound)?;
    assert_eq!(first.id, top.posting.id);
    assert_eq!(Some(Reaction::Like), top.my_reaction);
    assert_eq!(custom, top.custom_fields);

    // Private community, nothing for anonymous readers
    let anonymous = PostingQuery {
      community_id: Some(community.id),
      ..Default::default()
    }
    .list(pool)
    .await?;
    assert!(anonymous.is_empty());

    let liked = PostingQuery {
      my_person_id: Some(owner.id),
      min_likes: Some(1),
      name_contains: Some("fir".into()),
      ..Default::default()
    }
    .list(pool)
    .await?;
    assert_eq!(vec![first.id], liked.iter().map(|p| p.posting.id).collect::<Vec<_>>());

    let read = PostingView::read(pool, second.id, None).await?;
    assert_eq!(None, read.my_reaction);
    assert!(read.custom_fields.is_empty());

    Community::delete(pool, community.id).await?;
    Person::delete(pool, owner.id).await?;
    Person::delete(pool, fan.id).await?;
    Ok(())
  }
}
