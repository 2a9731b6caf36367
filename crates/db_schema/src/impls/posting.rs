use crate::{
  custom_fields::CustomFields,
  newtypes::{PersonId, PostingId},
  source::posting::{
    Posting,
    PostingInsertForm,
    PostingReaction,
    PostingReactionForm,
    PostingUpdateForm,
    Reaction,
  },
  traits::{Crud, Likeable},
  utils::{get_conn, DbPool},
};
use comflex_db_schema_file::schema::{posting, posting_reaction};
use diesel::{
  dsl::insert_into,
  result::Error,
  ExpressionMethods,
  OptionalExtension,
  QueryDsl,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};

#[async_trait]
impl Crud for Posting {
  type InsertForm = PostingInsertForm;
  type UpdateForm = PostingUpdateForm;
  type IdType = PostingId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    insert_into(posting::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn read(pool: &mut DbPool<'_>, posting_id: PostingId) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    posting::table.find(posting_id).first(conn).await
  }

  async fn update(
    pool: &mut DbPool<'_>,
    posting_id: PostingId,
    form: &Self::UpdateForm,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(posting::table.find(posting_id))
      .set(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn delete(pool: &mut DbPool<'_>, posting_id: PostingId) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(posting::table.find(posting_id))
      .execute(conn)
      .await
  }
}

impl Posting {
  pub fn custom_fields(&self) -> CustomFields {
    CustomFields::decode(&self.custom_fields)
  }
}

impl Reaction {
  pub fn score(self) -> i16 {
    match self {
      Reaction::Like => 1,
      Reaction::Dislike => -1,
    }
  }

  pub fn from_score(score: i16) -> Option<Self> {
    match score {
      1 => Some(Reaction::Like),
      -1 => Some(Reaction::Dislike),
      _ => None,
    }
  }

  /// The reaction left after `requested` is applied on top of `current`. Repeating the current
  /// reaction takes it back, anything else replaces it.
  pub fn toggle(current: Option<Reaction>, requested: Reaction) -> Option<Reaction> {
    if current == Some(requested) {
      None
    } else {
      Some(requested)
    }
  }
}

#[async_trait]
impl Likeable for PostingReaction {
  type Form = PostingReactionForm;
  type IdType = PostingId;
  async fn like(pool: &mut DbPool<'_>, form: &PostingReactionForm) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    insert_into(posting_reaction::table)
      .values(form)
      .on_conflict((posting_reaction::person_id, posting_reaction::posting_id))
      .do_update()
      .set(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn remove(
    pool: &mut DbPool<'_>,
    person_id: PersonId,
    posting_id: PostingId,
  ) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(posting_reaction::table.find((person_id, posting_id)))
      .execute(conn)
      .await
  }
}

impl PostingReaction {
  pub async fn read(
    pool: &mut DbPool<'_>,
    posting_id: PostingId,
    person_id: PersonId,
  ) -> Result<Option<Reaction>, Error> {
    let conn = &mut get_conn(pool).await?;
    let score = posting_reaction::table
      .find((person_id, posting_id))
      .select(posting_reaction::score)
      .first::<i16>(conn)
      .await
      .optional()?;
    Ok(score.and_then(Reaction::from_score))
  }

  /// Applies a like or dislike with toggle semantics and returns the resulting reaction. The old
  /// row is always deleted first, so the counter triggers only ever see inserts and deletes.
  pub async fn react(
    pool: &mut DbPool<'_>,
    posting_id: PostingId,
    person_id: PersonId,
    requested: Reaction,
  ) -> Result<Option<Reaction>, Error> {
    let conn = &mut get_conn(pool).await?;
    conn
      .transaction::<_, Error, _>(|conn| {
        async move {
          let current = PostingReaction::read(&mut conn.into(), posting_id, person_id).await?;
          let next = Reaction::toggle(current, requested);

          PostingReaction::remove(&mut conn.into(), person_id, posting_id).await?;
          if let Some(reaction) = next {
            let form = PostingReactionForm::new(posting_id, person_id, reaction.score());
            PostingReaction::like(&mut conn.into(), &form).await?;
          }
          Ok(next)
        }
        .scope_boxed()
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    source::{
      community::{Community, CommunityInsertForm},
      person::Person,
      post_type::PostType,
    },
    utils::build_db_pool_for_tests,
  };
  use comflex_utils::error::ComflexResult;
  use pretty_assertions::assert_eq;
  use serial_test::serial;
  use Reaction::*;

  #[test]
  fn test_toggle() {
    assert_eq!(Some(Like), Reaction::toggle(None, Like));
    assert_eq!(Some(Dislike), Reaction::toggle(None, Dislike));
    assert_eq!(None, Reaction::toggle(Some(Like), Like));
    assert_eq!(None, Reaction::toggle(Some(Dislike), Dislike));
    // The opposite reaction is replaced
    assert_eq!(Some(Dislike), Reaction::toggle(Some(Like), Dislike));
    assert_eq!(Some(Like), Reaction::toggle(Some(Dislike), Like));
  }

  #[test]
  fn test_toggle_twice_restores() {
    for start in [None, Some(Like), Some(Dislike)] {
      for requested in [Like, Dislike] {
        let once = Reaction::toggle(start, requested);
        let twice = Reaction::toggle(once, requested);
        if start == Some(requested) {
          assert_eq!(Some(requested), twice);
        } else {
          assert_eq!(None, twice);
        }
      }
    }
  }

  #[test]
  fn test_scores() {
    assert_eq!(Some(Like), Reaction::from_score(Like.score()));
    assert_eq!(Some(Dislike), Reaction::from_score(Dislike.score()));
    assert_eq!(None, Reaction::from_score(0));
  }

  #[tokio::test]
  #[serial]
  async fn test_reaction_scenario() -> ComflexResult<()> {
    let pool = &build_db_pool_for_tests().await;
    let pool = &mut pool.into();

    let owner = Person::register(pool, "reaction_owner", "reaction_password").await?;
    let u = Person::register(pool, "reaction_u", "reaction_password").await?;
    let form = CommunityInsertForm::new("Reactions".into(), owner.id);
    let community = Community::create_with_owner(pool, &form).await?;
    let post_type = PostType::list_for_community(pool, community.id)
      .await?
      .into_iter()
      .next()
      .ok_or(Error::NotFound)?;

    let form = PostingInsertForm::new(community.id, post_type.id, owner.id, "p".into());
    let p = Posting::create(pool, &form).await?;
    assert_eq!((0, 0), (p.likes, p.dislikes));
    assert!(p.custom_fields().is_empty());
    assert_eq!(1, Community::read(pool, community.id).await?.posts);

    assert_eq!(Some(Like), PostingReaction::react(pool, p.id, u.id, Like).await?);
    let p1 = Posting::read(pool, p.id).await?;
    assert_eq!((1, 0), (p1.likes, p1.dislikes));

    assert_eq!(
      Some(Dislike),
      PostingReaction::react(pool, p.id, u.id, Dislike).await?
    );
    let p2 = Posting::read(pool, p.id).await?;
    assert_eq!((0, 1), (p2.likes, p2.dislikes));

    assert_eq!(None, PostingReaction::react(pool, p.id, u.id, Dislike).await?);
    let p3 = Posting::read(pool, p.id).await?;
    assert_eq!((0, 0), (p3.likes, p3.dislikes));
    assert_eq!(None, PostingReaction::read(pool, p.id, u.id).await?);

    assert_eq!(1, Posting::delete(pool, p.id).await?);
    let community = Community::read(pool, community.id).await?;
    assert_eq!(0, community.posts);
    assert_eq!(None, community.last_post_at);

    Community::delete(pool, community.id).await?;
    Person::delete(pool, owner.id).await?;
    Person::delete(pool, u.id).await?;
    Ok(())
  }
}
