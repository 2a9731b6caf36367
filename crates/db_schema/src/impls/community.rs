use crate::{
  newtypes::{CommunityId, PersonId},
  source::{
    community::{
      Community,
      CommunityInsertForm,
      CommunityMember,
      CommunityMemberForm,
      CommunityModerator,
      CommunityModeratorForm,
      CommunityRole,
      CommunityUpdateForm,
    },
    post_type::{PostType, DEFAULT_POST_TYPE_NAME},
  },
  traits::{Crud, Joinable},
  utils::{functions::lower, get_conn, DbPool},
};
use chrono::Utc;
use comflex_db_schema_file::schema::{community, community_member, community_moderator};
use diesel::{
  dsl::{exists, insert_into},
  result::Error,
  select,
  ExpressionMethods,
  QueryDsl,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};

#[async_trait]
impl Crud for Community {
  type InsertForm = CommunityInsertForm;
  type UpdateForm = CommunityUpdateForm;
  type IdType = CommunityId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    insert_into(community::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn read(pool: &mut DbPool<'_>, community_id: CommunityId) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    community::table.find(community_id).first(conn).await
  }

  async fn update(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    form: &Self::UpdateForm,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(community::table.find(community_id))
      .set(form)
      .get_result::<Self>(conn)
      .await
  }

  /// Memberships, post types and postings go with it.
  async fn delete(pool: &mut DbPool<'_>, community_id: CommunityId) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(community::table.find(community_id))
      .execute(conn)
      .await
  }
}

impl Community {
  /// Creates the community with its owner as first member and the default post type.
  pub async fn create_with_owner(
    pool: &mut DbPool<'_>,
    form: &CommunityInsertForm,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    conn
      .transaction::<_, Error, _>(|conn| {
        async move {
          let community_ = Community::create(&mut conn.into(), form).await?;

          let member_form = CommunityMemberForm::new(community_.id, community_.owner_id);
          CommunityMember::join(&mut conn.into(), &member_form).await?;

          PostType::create_with_fields(
            &mut conn.into(),
            community_.id,
            DEFAULT_POST_TYPE_NAME,
            &[],
          )
          .await?;

          // Re-read for the member count maintained by the trigger
          Community::read(&mut conn.into(), community_.id).await
        }
        .scope_boxed()
      })
      .await
  }

  /// Case-insensitive name check, names are unique.
  pub async fn name_taken(pool: &mut DbPool<'_>, name: &str) -> Result<bool, Error> {
    let conn = &mut get_conn(pool).await?;
    select(exists(
      community::table.filter(lower(community::name).eq(name.trim().to_lowercase())),
    ))
    .get_result(conn)
    .await
  }

  /// Hands the community to another member. The previous owner stays a member, the new owner
  /// loses a moderator entry if one existed.
  pub async fn transfer(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    new_owner_id: PersonId,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    conn
      .transaction::<_, Error, _>(|conn| {
        async move {
          let form = CommunityModeratorForm::new(community_id, new_owner_id);
          CommunityModerator::leave(&mut conn.into(), &form).await?;

          let update_form = CommunityUpdateForm {
            owner_id: Some(new_owner_id),
            updated_at: Some(Some(Utc::now())),
            ..Default::default()
          };
          Community::update(&mut conn.into(), community_id, &update_form).await
        }
        .scope_boxed()
      })
      .await
  }

  /// Removes a member together with any moderator entry. Used for leaving and dismissal.
  pub async fn remove_member(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    person_id: PersonId,
  ) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    conn
      .transaction::<_, Error, _>(|conn| {
        async move {
          let form = CommunityModeratorForm::new(community_id, person_id);
          CommunityModerator::leave(&mut conn.into(), &form).await?;
          let form = CommunityMemberForm::new(community_id, person_id);
          CommunityMember::leave(&mut conn.into(), &form).await
        }
        .scope_boxed()
      })
      .await
  }
}

#[async_trait]
impl Joinable for CommunityMember {
  type Form = CommunityMemberForm;
  async fn join(pool: &mut DbPool<'_>, form: &CommunityMemberForm) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    // Joining again leaves the existing row untouched
    insert_into(community_member::table)
      .values(form)
      .on_conflict((community_member::person_id, community_member::community_id))
      .do_update()
      .set(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn leave(pool: &mut DbPool<'_>, form: &CommunityMemberForm) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(community_member::table.find((form.person_id, form.community_id)))
      .execute(conn)
      .await
  }
}

#[async_trait]
impl Joinable for CommunityModerator {
  type Form = CommunityModeratorForm;
  async fn join(pool: &mut DbPool<'_>, form: &CommunityModeratorForm) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    insert_into(community_moderator::table)
      .values(form)
      .on_conflict((
        community_moderator::person_id,
        community_moderator::community_id,
      ))
      .do_update()
      .set(form)
      .get_result::<Self>(conn)
      .await
  }

  async fn leave(pool: &mut DbPool<'_>, form: &CommunityModeratorForm) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(community_moderator::table.find((form.person_id, form.community_id)))
      .execute(conn)
      .await
  }
}

impl CommunityRole {
  /// Looks up the role of `person_id` in `community`.
  pub async fn read(
    pool: &mut DbPool<'_>,
    community: &Community,
    person_id: PersonId,
  ) -> Result<Self, Error> {
    if community.owner_id == person_id {
      return Ok(CommunityRole::Owner);
    }
    let conn = &mut get_conn(pool).await?;
    let is_moderator = select(exists(
      community_moderator::table.find((person_id, community.id)),
    ))
    .get_result::<bool>(conn)
    .await?;
    if is_moderator {
      return Ok(CommunityRole::Moderator);
    }
    let is_member = select(exists(community_member::table.find((person_id, community.id))))
      .get_result::<bool>(conn)
      .await?;
    Ok(if is_member {
      CommunityRole::Member
    } else {
      CommunityRole::Outsider
    })
  }

  pub fn is_member(self) -> bool {
    self != CommunityRole::Outsider
  }

  pub fn is_owner(self) -> bool {
    self == CommunityRole::Owner
  }

  pub fn is_owner_or_moderator(self) -> bool {
    matches!(self, CommunityRole::Owner | CommunityRole::Moderator)
  }

  /// The owner may dismiss any other member. A moderator may only dismiss plain members.
  pub fn can_dismiss(self, target: CommunityRole) -> bool {
    match self {
      CommunityRole::Owner => matches!(target, CommunityRole::Moderator | CommunityRole::Member),
      CommunityRole::Moderator => target == CommunityRole::Member,
      CommunityRole::Member | CommunityRole::Outsider => false,
    }
  }

  /// Moderators may leave too, they lose their moderator entry.
  pub fn can_leave(self) -> bool {
    matches!(self, CommunityRole::Moderator | CommunityRole::Member)
  }

  /// Only the owner appoints moderators, and only among the other members. Appointing an existing
  /// moderator again changes nothing.
  pub fn can_promote(self, target: CommunityRole) -> bool {
    self.is_owner() && matches!(target, CommunityRole::Member | CommunityRole::Moderator)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    source::{
      person::Person,
      post_type::{PostTypeField, DESCRIPTION_FIELD, TITLE_FIELD},
    },
    utils::build_db_pool_for_tests,
  };
  use comflex_utils::error::ComflexResult;
  use pretty_assertions::assert_eq;
  use serial_test::serial;
  use CommunityRole::*;

  #[test]
  fn test_dismiss_rules() {
    assert!(Owner.can_dismiss(Moderator));
    assert!(Owner.can_dismiss(Member));
    assert!(!Owner.can_dismiss(Owner));
    assert!(!Owner.can_dismiss(Outsider));
    assert!(Moderator.can_dismiss(Member));
    assert!(!Moderator.can_dismiss(Owner));
    assert!(!Moderator.can_dismiss(Moderator));
    assert!(!Member.can_dismiss(Member));
    assert!(!Outsider.can_dismiss(Member));
  }

  #[test]
  fn test_membership_rules() {
    assert!(!Owner.can_leave());
    assert!(Moderator.can_leave());
    assert!(Member.can_leave());
    assert!(!Outsider.can_leave());

    assert!(Owner.is_owner_or_moderator());
    assert!(Moderator.is_owner_or_moderator());
    assert!(!Member.is_owner_or_moderator());

    assert!(Owner.can_promote(Member));
    assert!(Owner.can_promote(Moderator));
    assert!(!Owner.can_promote(Outsider));
    assert!(!Owner.can_promote(Owner));
    assert!(!Moderator.can_promote(Member));

    assert!(Owner.is_member());
    assert!(!Outsider.is_member());
  }

  #[tokio::test]
  #[serial]
  async fn test_hikers_scenario() -> ComflexResult<()> {
    let pool = &build_db_pool_for_tests().await;
    let pool = &mut pool.into();

    let u1 = Person::register(pool, "hikers_u1", "hikers_u1_password").await?;
    let u2 = Person::register(pool, "hikers_u2", "hikers_u2_password").await?;

    let form = CommunityInsertForm::new("Hikers".into(), u1.id);
    let hikers = Community::create_with_owner(pool, &form).await?;
    assert_eq!(1, hikers.members);
    assert_eq!(Owner, CommunityRole::read(pool, &hikers, u1.id).await?);

    let post_types = PostType::list_for_community(pool, hikers.id).await?;
    assert_eq!(1, post_types.len());
    let default_type = <[_]>::first(&post_types).cloned().ok_or(Error::NotFound)?;
    assert_eq!(DEFAULT_POST_TYPE_NAME, default_type.name);
    let fields = PostTypeField::list_for_post_type(pool, default_type.id).await?;
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(vec![TITLE_FIELD, DESCRIPTION_FIELD], names);
    assert!(fields.iter().all(|f| f.is_fixed));

    CommunityMember::join(pool, &CommunityMemberForm::new(hikers.id, u2.id)).await?;
    // Joining twice is harmless
    CommunityMember::join(pool, &CommunityMemberForm::new(hikers.id, u2.id)).await?;
    assert_eq!(2, Community::read(pool, hikers.id).await?.members);

    CommunityModerator::join(pool, &CommunityModeratorForm::new(hikers.id, u2.id)).await?;
    let u2_role = CommunityRole::read(pool, &hikers, u2.id).await?;
    assert_eq!(Moderator, u2_role);
    assert!(!u2_role.can_dismiss(CommunityRole::read(pool, &hikers, u1.id).await?));

    let transferred = Community::transfer(pool, hikers.id, u2.id).await?;
    assert_eq!(u2.id, transferred.owner_id);
    assert_eq!(Owner, CommunityRole::read(pool, &transferred, u2.id).await?);
    assert_eq!(Member, CommunityRole::read(pool, &transferred, u1.id).await?);

    Community::remove_member(pool, hikers.id, u1.id).await?;
    let after_leave = Community::read(pool, hikers.id).await?;
    assert_eq!(1, after_leave.members);
    assert_eq!(Outsider, CommunityRole::read(pool, &after_leave, u1.id).await?);

    assert!(Community::name_taken(pool, "hikers").await?);
    let num_deleted = Community::delete(pool, hikers.id).await?;
    assert_eq!(1, num_deleted);
    assert!(PostType::list_for_community(pool, hikers.id).await?.is_empty());

    Person::delete(pool, u1.id).await?;
    Person::delete(pool, u2.id).await?;
    Ok(())
  }
}
