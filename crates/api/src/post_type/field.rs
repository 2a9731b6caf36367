use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_owner_or_moderator, community_and_role, read_post_type},
};
use comflex_db_schema::{
  impls::post_type::validate_field_definitions,
  source::post_type::{FieldDefinition, PostTypeField, PostTypeFieldInsertForm},
};
use comflex_db_views::{
  api::{AddPostTypeField, PostTypeResponse, RemovePostTypeField},
  structs::{LocalUserView, PostTypeView},
};
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};

/// Adds a field to an existing post type. Postings written before keep their values, the new
/// field is simply missing from them.
#[tracing::instrument(skip(context))]
pub async fn add_post_type_field(
  data: Json<AddPostTypeField>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostTypeResponse>> {
  let post_type = read_post_type(&mut context.pool(), data.post_type_id).await?;
  let (_, role) =
    community_and_role(&mut context.pool(), post_type.community_id, &local_user_view).await?;
  check_owner_or_moderator(role)?;

  let existing = PostTypeField::list_for_post_type(&mut context.pool(), post_type.id).await?;
  let definition = FieldDefinition {
    name: data.name.clone(),
    field_type: data.field_type,
  };
  validate_field_definitions(&existing, &[definition])?;

  let form =
    PostTypeFieldInsertForm::new(post_type.id, data.name.trim().to_string(), data.field_type);
  PostTypeField::create(&mut context.pool(), &form).await?;

  let post_type_view = PostTypeView::read(&mut context.pool(), post_type.id).await?;
  Ok(Json(PostTypeResponse { post_type_view }))
}

/// Removes a field that is not one of the fixed title and description fields.
#[tracing::instrument(skip(context))]
pub async fn remove_post_type_field(
  data: Json<RemovePostTypeField>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostTypeResponse>> {
  let field = PostTypeField::read(&mut context.pool(), data.field_id)
    .await
    .with_comflex_type(ComflexErrorType::FieldNotInPostType)?;
  let post_type = read_post_type(&mut context.pool(), field.post_type_id).await?;
  let (_, role) =
    community_and_role(&mut context.pool(), post_type.community_id, &local_user_view).await?;
  check_owner_or_moderator(role)?;

  if field.is_fixed {
    Err(ComflexErrorType::FixedFieldCannotBeRemoved)?
  }
  PostTypeField::delete(&mut context.pool(), field.id).await?;

  let post_type_view = PostTypeView::read(&mut context.pool(), post_type.id).await?;
  Ok(Json(PostTypeResponse { post_type_view }))
}
