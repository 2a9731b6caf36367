use crate::structs::CommunityView;
use chrono::{DateTime, Utc};
use comflex_db_schema::{
  newtypes::{CommunityId, PersonId},
  source::{
    community::{Community, CommunityRole},
    person::Person,
  },
  traits::JoinView,
  utils::{fuzzy_search, get_conn, limit_and_offset, DbPool},
  CommunitySortType,
};
use comflex_db_schema_file::schema::{community, community_member, community_moderator, person};
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

type CommunityViewTuple = (Community, Person, Option<PersonId>, Option<PersonId>);

impl CommunityView {
  #[diesel::dsl::auto_type(no_type_alias)]
  fn joins(my_person_id: Option<PersonId>) -> _ {
    let member_join = community_member::table.on(
      community_member::community_id
        .eq(community::id)
        .and(community_member::person_id.nullable().eq(my_person_id)),
    );
    let moderator_join = community_moderator::table.on(
      community_moderator::community_id
        .eq(community::id)
        .and(community_moderator::person_id.nullable().eq(my_person_id)),
    );

    community::table
      .inner_join(person::table)
      .left_join(member_join)
      .left_join(moderator_join)
  }

  pub async fn read(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    my_person_id: Option<PersonId>,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    let res = Self::joins(my_person_id)
      .filter(community::id.eq(community_id))
      .select((
        Community::as_select(),
        Person::as_select(),
        community_member::person_id.nullable(),
        community_moderator::person_id.nullable(),
      ))
      .first::<CommunityViewTuple>(conn)
      .await?;
    Ok(Self::from_tuple(res))
  }

  /// Moderators in the order they were added. The owner is never among them.
  pub async fn moderators(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
  ) -> Result<Vec<Person>, Error> {
    let conn = &mut get_conn(pool).await?;
    community_moderator::table
      .inner_join(person::table)
      .filter(community_moderator::community_id.eq(community_id))
      .order_by(community_moderator::published_at)
      .select(Person::as_select())
      .load::<Person>(conn)
      .await
  }

  pub async fn members(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
  ) -> Result<Vec<Person>, Error> {
    let conn = &mut get_conn(pool).await?;
    community_member::table
      .inner_join(person::table)
      .filter(community_member::community_id.eq(community_id))
      .order_by(community_member::published_at)
      .select(Person::as_select())
      .load::<Person>(conn)
      .await
  }

  /// Private communities are shown to members only.
  pub fn is_visible(&self) -> bool {
    self.community.is_public || self.my_role.is_member()
  }
}

#[derive(Default, Clone, Debug)]
pub struct CommunityQuery {
  pub sort: Option<CommunitySortType>,
  pub my_person_id: Option<PersonId>,
  /// Only communities the requesting person belongs to
  pub member_only: bool,
  pub name_contains: Option<String>,
  pub description_contains: Option<String>,
  pub created_after: Option<DateTime<Utc>>,
  pub created_before: Option<DateTime<Utc>>,
  pub min_members: Option<i64>,
  pub max_members: Option<i64>,
  pub min_posts: Option<i64>,
  pub max_posts: Option<i64>,
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

impl CommunityQuery {
  pub async fn list(self, pool: &mut DbPool<'_>) -> Result<Vec<CommunityView>, Error> {
    use CommunitySortType::*;
    let o = self;
    if o.member_only && o.my_person_id.is_none() {
      return Ok(vec![]);
    }
    let conn = &mut get_conn(pool).await?;

    let mut query = CommunityView::joins(o.my_person_id)
      .select((
        Community::as_select(),
        Person::as_select(),
        community_member::person_id.nullable(),
        community_moderator::person_id.nullable(),
      ))
      .into_boxed();

    let is_member = community_member::person_id.nullable().is_not_null();
    query = if o.member_only {
      query.filter(is_member)
    } else {
      query.filter(community::is_public.eq(true).or(is_member))
    };

    if let Some(name) = &o.name_contains {
      query = query.filter(community::name.ilike(fuzzy_search(name)));
    }
    if let Some(description) = &o.description_contains {
      query = query.filter(community::description.ilike(fuzzy_search(description)));
    }
    if let Some(after) = o.created_after {
      query = query.filter(community::published_at.ge(after));
    }
    if let Some(before) = o.created_before {
      query = query.filter(community::published_at.lt(before));
    }
    if let Some(min) = o.min_members {
      query = query.filter(community::members.ge(min));
    }
    if let Some(max) = o.max_members {
      query = query.filter(community::members.le(max));
    }
    if let Some(min) = o.min_posts {
      query = query.filter(community::posts.ge(min));
    }
    if let Some(max) = o.max_posts {
      query = query.filter(community::posts.le(max));
    }

    query = match o.sort.unwrap_or_default() {
      New => query.order_by(community::published_at.desc()),
      RecentlyActive => query
        .filter(community::last_post_at.is_not_null())
        .order_by(community::last_post_at.desc()),
      MostMembers => query
        .order_by(community::members.desc())
        .then_order_by(community::published_at.desc()),
    };
    query = query.then_order_by(community::id.desc());

    let (limit, offset) = limit_and_offset(o.page, o.limit)?;
    query = query.limit(limit).offset(offset);

    debug!("Community Query: {:?}", debug_query::<Pg, _>(&query));

    let res = query.load::<CommunityViewTuple>(conn).await?;
    Ok(res.into_iter().map(CommunityView::from_tuple).collect())
  }
}

impl JoinView for CommunityView {
  type JoinTuple = CommunityViewTuple;
  fn from_tuple(a: Self::JoinTuple) -> Self {
    let (community, owner, member, moderator) = a;
    // The owner is always a member, so a member row for the owner id means it is the requester
    let my_role = match (member, moderator) {
      (Some(me), _) if me == community.owner_id => CommunityRole::Owner,
      (_, Some(_)) => CommunityRole::Moderator,
      (Some(_), None) => CommunityRole::Member,
      (None, None) => CommunityRole::Outsider,
    };
    Self {
      community,
      owner,
      my_role,
    }
  }
}
