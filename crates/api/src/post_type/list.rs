use actix_web::web::{Data, Json, Query};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_community_visible, read_community},
};
use comflex_db_views::{
  api::{ListPostTypes, ListPostTypesResponse},
  structs::{LocalUserView, PostTypeView},
};
use comflex_utils::error::ComflexResult;

#[tracing::instrument(skip(context))]
pub async fn list_post_types(
  data: Query<ListPostTypes>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<ListPostTypesResponse>> {
  let person_id = local_user_view.map(|l| l.person.id);
  let community = read_community(&mut context.pool(), data.community_id).await?;
  check_community_visible(&mut context.pool(), &community, person_id).await?;

  let post_types = PostTypeView::list_for_community(&mut context.pool(), community.id).await?;
  Ok(Json(ListPostTypesResponse { post_types }))
}
