use actix_web::web::{Data, Json, Query};
use comflex_api_utils::context::ComflexContext;
use comflex_db_views::{
  api::{AdvancedSearch, AdvancedSearchResponse, Search, SearchResponse},
  community_view::CommunityQuery,
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;

/// Communities whose name contains `q`.
#[tracing::instrument(skip(context))]
pub async fn search(
  data: Query<Search>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<SearchResponse>> {
  let q = data.q.trim();
  let communities = CommunityQuery {
    my_person_id: local_user_view.map(|l| l.person.id),
    name_contains: (!q.is_empty()).then(|| q.to_string()),
    page: data.page,
    limit: data.limit,
    ..Default::default()
  }
  .list(&mut context.pool())
  .await?;
  Ok(Json(SearchResponse { communities }))
}

#[tracing::instrument(skip(context))]
pub async fn advanced_search(
  data: Query<AdvancedSearch>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<AdvancedSearchResponse>> {
  let my_person_id = local_user_view.map(|l| l.person.id);
  let (communities, postings) = data.run(&mut context.pool(), my_person_id).await?;
  Ok(Json(AdvancedSearchResponse {
    communities,
    postings,
  }))
}
