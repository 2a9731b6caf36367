use super::react_to_posting;
use actix_web::web::{Data, Json};
use comflex_api_utils::context::ComflexContext;
use comflex_db_schema::source::posting::Reaction;
use comflex_db_views::{
  api::{PostingResponse, ReactToPosting},
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;

/// Likes a posting, or takes an existing like back. A dislike is replaced.
#[tracing::instrument(skip(context))]
pub async fn like_posting(
  data: Json<ReactToPosting>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostingResponse>> {
  let res = react_to_posting(&data, &context, &local_user_view, Reaction::Like).await?;
  Ok(Json(res))
}

/// Dislikes a posting, or takes an existing dislike back. A like is replaced.
#[tracing::instrument(skip(context))]
pub async fn dislike_posting(
  data: Json<ReactToPosting>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostingResponse>> {
  let res = react_to_posting(&data, &context, &local_user_view, Reaction::Dislike).await?;
  Ok(Json(res))
}
