use actix_web::web::{Data, Json, Query};
use comflex_api_utils::context::ComflexContext;
use comflex_db_views::{
  api::{GetCommunity, GetCommunityResponse},
  posting_view::PostingQuery,
  structs::{CommunityView, LocalUserView, PostTypeView, PostingView},
};
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};

/// The community page. Outsiders of a private community only get its header and moderators.
#[tracing::instrument(skip(context))]
pub async fn get_community(
  data: Query<GetCommunity>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<GetCommunityResponse>> {
  let my_person_id = local_user_view.map(|l| l.person.id);
  let community_view = CommunityView::read(&mut context.pool(), data.id, my_person_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindCommunity)?;
  let community_id = community_view.community.id;
  let moderators = CommunityView::moderators(&mut context.pool(), community_id).await?;

  let (post_types, postings, most_liked) = if community_view.is_visible() {
    let post_types = PostTypeView::list_for_community(&mut context.pool(), community_id).await?;
    let postings = PostingQuery {
      community_id: Some(community_id),
      my_person_id,
      ..Default::default()
    }
    .list(&mut context.pool())
    .await?;
    let most_liked =
      PostingView::most_liked(&mut context.pool(), community_id, my_person_id).await?;
    (post_types, postings, most_liked)
  } else {
    (vec![], vec![], None)
  };

  Ok(Json(GetCommunityResponse {
    community_view,
    post_types,
    moderators,
    postings,
    most_liked,
  }))
}
