use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_can_dismiss, community_and_role},
};
use comflex_db_schema::source::community::{Community, CommunityRole};
use comflex_db_views::{
  api::{DismissMember, SuccessResponse},
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;

#[tracing::instrument(skip(context))]
pub async fn dismiss_member(
  data: Json<DismissMember>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<SuccessResponse>> {
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  let target_role = CommunityRole::read(&mut context.pool(), &community, data.person_id).await?;
  check_can_dismiss(role, target_role)?;

  Community::remove_member(&mut context.pool(), community.id, data.person_id).await?;
  Ok(Json(SuccessResponse::default()))
}
