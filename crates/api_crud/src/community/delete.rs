use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_community_owner, community_and_role},
};
use comflex_db_schema::{source::community::Community, traits::Crud};
use comflex_db_views::{
  api::{DeleteCommunity, SuccessResponse},
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;
use tracing::info;

/// Removes the community with its memberships, post types and postings.
#[tracing::instrument(skip(context))]
pub async fn delete_community(
  data: Json<DeleteCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<SuccessResponse>> {
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  check_community_owner(role)?;

  Community::delete(&mut context.pool(), community.id).await?;
  info!("Deleted community {} ({})", community.name, community.id);
  Ok(Json(SuccessResponse::default()))
}
