pub mod add_mod;
pub mod dismiss;
pub mod join;
pub mod leave;
pub mod transfer;

#[cfg(test)]
mod tests {
  use crate::{
    community::{
      add_mod::add_mod_to_community,
      dismiss::dismiss_member,
      join::join_community,
      leave::leave_community,
      transfer::transfer_community,
    },
    post_type::create::create_post_type,
  };
  use actix_web::web::{Data, Json};
  use comflex_api_utils::context::ComflexContext;
  use comflex_db_schema::{
    source::{
      community::{Community, CommunityInsertForm, CommunityRole},
      person::Person,
      post_type::PostType,
    },
    traits::Crud,
  };
  use comflex_db_views::{
    api::{
      AddModToCommunity,
      CreatePostType,
      DismissMember,
      JoinCommunity,
      LeaveCommunity,
      TransferCommunity,
    },
    structs::LocalUserView,
  };
  use comflex_utils::error::{ComflexErrorType, ComflexResult};
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_community_roles() -> ComflexResult<()> {
    let context = Data::new(ComflexContext::init_test_context().await);
    let pool = &mut context.pool();

    let alice = Person::register(pool, "roles_alice", "roles_password").await?;
    let bob = Person::register(pool, "roles_bob", "roles_password").await?;
    let carol = Person::register(pool, "roles_carol", "roles_password").await?;
    let form = CommunityInsertForm::new("Hikers Roles".into(), alice.id);
    let hikers = Community::create_with_owner(pool, &form).await?;
    let community_id = hikers.id;

    let as_alice = LocalUserView {
      person: alice.clone(),
    };
    let as_bob = LocalUserView { person: bob.clone() };
    let as_carol = LocalUserView {
      person: carol.clone(),
    };

    let join = JoinCommunity { community_id };
    let joined = join_community(Json(join), context.clone(), as_bob.clone())
      .await?
      .0
      .community_view;
    assert_eq!(CommunityRole::Member, joined.my_role);
    assert_eq!(2, joined.community.members);
    join_community(Json(join), context.clone(), as_carol.clone()).await?;

    // Plain members may not define post types
    let post_type = CreatePostType {
      community_id,
      name: "Trip".into(),
      fields: vec![],
    };
    let denied = create_post_type(Json(post_type.clone()), context.clone(), as_bob.clone()).await;
    assert_eq!(
      Some(ComflexErrorType::NotOwnerOrModerator),
      denied.err().map(|e| e.error_type)
    );
    let post_types = PostType::list_for_community(pool, community_id).await?;
    assert_eq!(1, post_types.len());

    let add_mod = AddModToCommunity {
      community_id,
      person_id: bob.id,
      added: true,
    };
    let moderators = add_mod_to_community(Json(add_mod), context.clone(), as_alice.clone())
      .await?
      .0
      .moderators;
    assert_eq!(vec![bob.id], moderators.iter().map(|p| p.id).collect::<Vec<_>>());
    create_post_type(Json(post_type), context.clone(), as_bob.clone()).await?;

    let dismiss_owner = DismissMember {
      community_id,
      person_id: alice.id,
    };
    let denied = dismiss_member(Json(dismiss_owner), context.clone(), as_bob.clone()).await;
    assert_eq!(
      Some(ComflexErrorType::CannotDismissMember),
      denied.err().map(|e| e.error_type)
    );
    let dismiss_carol = DismissMember {
      community_id,
      person_id: carol.id,
    };
    dismiss_member(Json(dismiss_carol), context.clone(), as_bob.clone()).await?;

    let leave = LeaveCommunity { community_id };
    let denied = leave_community(Json(leave), context.clone(), as_alice.clone()).await;
    assert_eq!(
      Some(ComflexErrorType::OwnerCannotLeave),
      denied.err().map(|e| e.error_type)
    );
    let members_before_leave = Community::read(pool, community_id).await?.members;
    assert_eq!(2, members_before_leave);

    let transfer = TransferCommunity {
      community_id,
      person_id: bob.id,
    };
    transfer_community(Json(transfer), context.clone(), as_alice.clone()).await?;
    let hikers = Community::read(pool, community_id).await?;
    assert_eq!(bob.id, hikers.owner_id);

    // The previous owner stays a member and may leave now
    let left = leave_community(Json(leave), context.clone(), as_alice)
      .await?
      .0
      .community_view;
    assert_eq!(CommunityRole::Outsider, left.my_role);

    Community::delete(pool, community_id).await?;
    Person::delete(pool, alice.id).await?;
    Person::delete(pool, bob.id).await?;
    Person::delete(pool, carol.id).await?;
    Ok(())
  }
}
