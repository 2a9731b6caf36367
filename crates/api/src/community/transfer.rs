use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_can_transfer, community_and_role},
};
use comflex_db_schema::source::community::{Community, CommunityRole};
use comflex_db_views::{
  api::{CommunityResponse, TransferCommunity},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};
use tracing::info;

#[tracing::instrument(skip(context))]
pub async fn transfer_community(
  data: Json<TransferCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<CommunityResponse>> {
  let person_id = local_user_view.person.id;
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  let new_owner_role = CommunityRole::read(&mut context.pool(), &community, data.person_id).await?;
  check_can_transfer(role, person_id, data.person_id, new_owner_role)?;

  Community::transfer(&mut context.pool(), community.id, data.person_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntTransferCommunity)?;
  info!(
    "Community {} transferred from {} to {}",
    community.id, person_id, data.person_id
  );

  let community_view =
    CommunityView::read(&mut context.pool(), community.id, Some(person_id)).await?;
  Ok(Json(CommunityResponse { community_view }))
}
