use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_owner_or_moderator, community_and_role, read_post_type},
};
use comflex_db_schema::source::post_type::PostType;
use comflex_db_views::{
  api::{DeletePostType, SuccessResponse},
  structs::LocalUserView,
};
use comflex_utils::error::ComflexResult;
use tracing::info;

/// Deleting a post type deletes its fields and every posting of that type.
#[tracing::instrument(skip(context))]
pub async fn delete_post_type(
  data: Json<DeletePostType>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<SuccessResponse>> {
  let post_type = read_post_type(&mut context.pool(), data.post_type_id).await?;
  let (_, role) =
    community_and_role(&mut context.pool(), post_type.community_id, &local_user_view).await?;
  check_owner_or_moderator(role)?;

  PostType::delete(&mut context.pool(), post_type.id).await?;
  info!("Deleted post type {}", post_type.name);
  Ok(Json(SuccessResponse::default()))
}
