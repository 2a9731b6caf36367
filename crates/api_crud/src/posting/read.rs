use actix_web::web::{Data, Json, Query};
use comflex_api_utils::{context::ComflexContext, utils::check_community_visible};
use comflex_db_views::{
  api::{GetPosting, PostingResponse},
  structs::{LocalUserView, PostingView},
};
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};

/// A posting with its decoded custom values, counts and the requester's reaction.
#[tracing::instrument(skip(context))]
pub async fn get_posting(
  data: Query<GetPosting>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<PostingResponse>> {
  let my_person_id = local_user_view.map(|l| l.person.id);
  let posting_view = PostingView::read(&mut context.pool(), data.id, my_person_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindPosting)?;
  check_community_visible(&mut context.pool(), &posting_view.community, my_person_id).await?;
  Ok(Json(PostingResponse { posting_view }))
}
