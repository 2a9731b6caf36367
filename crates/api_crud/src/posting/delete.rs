use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  media::remove_stored_files,
  utils::{check_posting_author, read_posting},
};
use comflex_db_schema::{custom_fields::CustomFields, source::posting::Posting, traits::Crud};
use comflex_db_views::{
  api::{DeletePosting, SuccessResponse},
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;

#[tracing::instrument(skip(context))]
pub async fn delete_posting(
  data: Json<DeletePosting>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<SuccessResponse>> {
  let posting = read_posting(&mut context.pool(), data.posting_id).await?;
  check_posting_author(local_user_view.person.id, &posting)?;

  Posting::delete(&mut context.pool(), posting.id).await?;
  let stored_files = CustomFields::decode(&posting.custom_fields).stored_files();
  remove_stored_files(&stored_files, context.settings()).await;
  Ok(Json(SuccessResponse::default()))
}
