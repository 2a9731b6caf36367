use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_owner_or_moderator, community_and_role},
};
use comflex_db_schema::{
  impls::post_type::validate_field_definitions,
  source::post_type::PostType,
};
use comflex_db_views::{
  api::{CreatePostType, PostTypeResponse},
  structs::{LocalUserView, PostTypeView},
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  utils::validation::is_valid_post_type_name,
};
use tracing::info;

/// Creates a post type with its fixed fields and the requested extra fields, all at once.
#[tracing::instrument(skip(context))]
pub async fn create_post_type(
  data: Json<CreatePostType>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostTypeResponse>> {
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  check_owner_or_moderator(role)?;

  is_valid_post_type_name(&data.name)?;
  if PostType::name_taken(&mut context.pool(), community.id, &data.name).await? {
    Err(ComflexErrorType::PostTypeAlreadyExists)?
  }
  validate_field_definitions(&[], &data.fields)?;

  let post_type = PostType::create_with_fields(
    &mut context.pool(),
    community.id,
    &data.name,
    &data.fields,
  )
  .await
  .with_comflex_type(ComflexErrorType::CouldntCreatePostType)?;
  info!(
    "Created post type {} in community {}",
    post_type.name, community.id
  );

  let post_type_view = PostTypeView::read(&mut context.pool(), post_type.id).await?;
  Ok(Json(PostTypeResponse { post_type_view }))
}
