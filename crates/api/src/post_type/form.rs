use actix_web::web::{Data, Json, Query};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_community_visible, read_community, read_post_type},
};
use comflex_db_views::{
  api::{GetPostingForm, GetPostingFormResponse},
  structs::{LocalUserView, PostTypeView},
};
use comflex_utils::error::ComflexResult;

/// The inputs a client renders to submit a posting of one post type.
#[tracing::instrument(skip(context))]
pub async fn get_posting_form(
  data: Query<GetPostingForm>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<GetPostingFormResponse>> {
  let person_id = local_user_view.map(|l| l.person.id);
  let post_type = read_post_type(&mut context.pool(), data.post_type_id).await?;
  let community = read_community(&mut context.pool(), post_type.community_id).await?;
  check_community_visible(&mut context.pool(), &community, person_id).await?;

  let view = PostTypeView::read(&mut context.pool(), post_type.id).await?;
  let fields = view.posting_form();
  Ok(Json(GetPostingFormResponse {
    post_type: view.post_type,
    fields,
  }))
}
