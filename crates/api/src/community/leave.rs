use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_can_leave, community_and_role},
};
use comflex_db_schema::source::community::Community;
use comflex_db_views::{
  api::{CommunityResponse, LeaveCommunity},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::error::ComflexResult;

#[tracing::instrument(skip(context))]
pub async fn leave_community(
  data: Json<LeaveCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<CommunityResponse>> {
  let person_id = local_user_view.person.id;
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  check_can_leave(role)?;

  // A leaving moderator gives up the moderator entry as well
  Community::remove_member(&mut context.pool(), community.id, person_id).await?;

  let community_view =
    CommunityView::read(&mut context.pool(), community.id, Some(person_id)).await?;
  Ok(Json(CommunityResponse { community_view }))
}
