use comflex_api_utils::{context::ComflexContext, utils::check_community_visible};
use comflex_db_schema::source::posting::{PostingReaction, Reaction};
use comflex_db_views::{
  api::{PostingResponse, ReactToPosting},
  structs::{LocalUserView, PostingView},
};
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};
use tracing::debug;

pub mod like;

/// Applies a like or dislike with toggle semantics and returns the updated posting.
async fn react_to_posting(
  data: &ReactToPosting,
  context: &ComflexContext,
  local_user_view: &LocalUserView,
  requested: Reaction,
) -> ComflexResult<PostingResponse> {
  let person_id = local_user_view.person.id;
  let view = PostingView::read(&mut context.pool(), data.posting_id, Some(person_id))
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindPosting)?;

  check_community_visible(&mut context.pool(), &view.community, Some(person_id)).await?;

  let reaction = PostingReaction::react(&mut context.pool(), data.posting_id, person_id, requested)
    .await
    .with_comflex_type(ComflexErrorType::CouldntReactToPosting)?;
  debug!(
    "Reaction of {} on posting {}: {:?}",
    person_id, data.posting_id, reaction
  );

  let posting_view =
    PostingView::read(&mut context.pool(), data.posting_id, Some(person_id)).await?;
  Ok(PostingResponse { posting_view })
}

#[cfg(test)]
mod tests {
  use super::like::{dislike_posting, like_posting};
  use actix_web::web::{Data, Json};
  use comflex_api_utils::context::ComflexContext;
  use comflex_db_schema::{
    source::{
      community::{Community, CommunityInsertForm},
      person::Person,
      post_type::PostType,
      posting::{Posting, PostingInsertForm, Reaction},
    },
    traits::Crud,
  };
  use comflex_db_views::{api::ReactToPosting, structs::LocalUserView};
  use comflex_utils::error::{ComflexErrorType, ComflexResult};
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_reactions_toggle() -> ComflexResult<()> {
    let context = Data::new(ComflexContext::init_test_context().await);
    let pool = &mut context.pool();

    let owner = Person::register(pool, "reaction_owner", "reaction_password").await?;
    let outsider = Person::register(pool, "reaction_outsider", "reaction_password").await?;
    let mut form = CommunityInsertForm::new("Quiet Readers".into(), owner.id);
    form.is_public = Some(false);
    let community = Community::create_with_owner(pool, &form).await?;
    let post_type = PostType::list_for_community(pool, community.id)
      .await?
      .into_iter()
      .next()
      .ok_or(ComflexErrorType::CouldntFindPostType)?;
    let form = PostingInsertForm::new(community.id, post_type.id, owner.id, "Book".into());
    let posting = Posting::create(pool, &form).await?;

    let react = ReactToPosting {
      posting_id: posting.id,
    };
    let as_owner = LocalUserView {
      person: owner.clone(),
    };
    let liked = like_posting(Json(react), context.clone(), as_owner.clone())
      .await?
      .0
      .posting_view;
    assert_eq!(Some(Reaction::Like), liked.my_reaction);
    assert_eq!((1, 0), (liked.posting.likes, liked.posting.dislikes));

    let disliked = dislike_posting(Json(react), context.clone(), as_owner.clone())
      .await?
      .0
      .posting_view;
    assert_eq!(Some(Reaction::Dislike), disliked.my_reaction);
    assert_eq!((0, 1), (disliked.posting.likes, disliked.posting.dislikes));

    // Sending the same reaction again takes it back
    let cleared = dislike_posting(Json(react), context.clone(), as_owner)
      .await?
      .0
      .posting_view;
    assert_eq!(None, cleared.my_reaction);
    assert_eq!((0, 0), (cleared.posting.likes, cleared.posting.dislikes));

    let as_outsider = LocalUserView {
      person: outsider.clone(),
    };
    let hidden = like_posting(Json(react), context.clone(), as_outsider).await;
    assert_eq!(
      Some(ComflexErrorType::NotAMember),
      hidden.err().map(|e| e.error_type)
    );

    Community::delete(pool, community.id).await?;
    Person::delete(pool, owner.id).await?;
    Person::delete(pool, outsider.id).await?;
    Ok(())
  }
}
