use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_can_set_moderator, community_and_role},
};
use comflex_db_schema::{
  source::community::{CommunityModerator, CommunityModeratorForm, CommunityRole},
  traits::Joinable,
};
use comflex_db_views::{
  api::{AddModToCommunity, AddModToCommunityResponse},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::error::ComflexResult;
use tracing::info;

#[tracing::instrument(skip(context))]
pub async fn add_mod_to_community(
  data: Json<AddModToCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<AddModToCommunityResponse>> {
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  let target_role = CommunityRole::read(&mut context.pool(), &community, data.person_id).await?;
  check_can_set_moderator(role, target_role, data.added)?;

  let form = CommunityModeratorForm::new(community.id, data.person_id);
  if data.added {
    CommunityModerator::join(&mut context.pool(), &form).await?;
  } else {
    CommunityModerator::leave(&mut context.pool(), &form).await?;
  }
  info!(
    "Moderator {} in community {}: added = {}",
    data.person_id, community.id, data.added
  );

  let moderators = CommunityView::moderators(&mut context.pool(), community.id).await?;
  Ok(Json(AddModToCommunityResponse { moderators }))
}
