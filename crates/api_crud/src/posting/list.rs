use actix_web::web::{Data, Json, Query};
use comflex_api_utils::context::ComflexContext;
use comflex_db_views::{
  api::{ListPostings, ListPostingsResponse},
  posting_view::PostingQuery,
  structs::LocalUserView,
};
use comflex_utils::error::{ComflexErrorType, ComflexResult};

#[tracing::instrument(skip(context))]
pub async fn list_postings(
  data: Query<ListPostings>,
  context: Data<ComflexContext>,
  local_user_view: Option<LocalUserView>,
) -> ComflexResult<Json<ListPostingsResponse>> {
  let my_person_id = local_user_view.map(|l| l.person.id);
  let creator_id = if data.mine.unwrap_or_default() {
    Some(my_person_id.ok_or(ComflexErrorType::NotLoggedIn)?)
  } else {
    None
  };

  let postings = PostingQuery {
    sort: data.sort,
    my_person_id,
    community_id: data.community_id,
    post_type_id: data.post_type_id,
    creator_id,
    page: data.page,
    limit: data.limit,
    ..Default::default()
  }
  .list(&mut context.pool())
  .await?;
  Ok(Json(ListPostingsResponse { postings }))
}
