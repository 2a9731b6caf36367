use actix_web::web::{Data, Json, Query};
use comflex_api_utils::context::ComflexContext;
use comflex_db_views::{
  api::{ListCommunities, ListCommunitiesResponse},
  community_view::CommunityQuery,
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;

#[tracing::instrument(skip(context))]
pub async fn list_communities(
  data: Query<ListCommunities>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<ListCommunitiesResponse>> {
  let communities = CommunityQuery {
    sort: data.sort,
    my_person_id: local_user_view.map(|l| l.person.id),
    page: data.page,
    limit: data.limit,
    ..Default::default()
  }
  .list(&mut context.pool())
  .await?;
  Ok(Json(ListCommunitiesResponse { communities }))
}

/// The communities the requester belongs to, owned ones included.
#[tracing::instrument(skip(context))]
pub async fn my_communities(
  data: Query<ListCommunities>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<ListCommunitiesResponse>> {
  let communities = CommunityQuery {
    sort: data.sort,
    my_person_id: Some(local_user_view.person.id),
    member_only: true,
    page: data.page,
    limit: data.limit,
    ..Default::default()
  }
  .list(&mut context.pool())
  .await?;
  Ok(Json(ListCommunitiesResponse { communities }))
}
