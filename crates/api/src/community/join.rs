use actix_web::web::{Data, Json};
use comflex_api_utils::{context::ComflexContext, utils::read_community};
use comflex_db_schema::{
  source::community::{CommunityMember, CommunityMemberForm},
  traits::Joinable,
};
use comflex_db_views::{
  api::{CommunityResponse, JoinCommunity},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::error::ComflexResult;

/// Joining twice keeps the first membership.
#[tracing::instrument(skip(context))]
pub async fn join_community(
  data: Json<JoinCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<CommunityResponse>> {
  let person_id = local_user_view.person.id;
  let community = read_community(&mut context.pool(), data.community_id).await?;

  let form = CommunityMemberForm::new(community.id, person_id);
  CommunityMember::join(&mut context.pool(), &form).await?;

  let community_view =
    CommunityView::read(&mut context.pool(), community.id, Some(person_id)).await?;
  Ok(Json(CommunityResponse { community_view }))
}
