use actix_web::web::{Data, Json};
use comflex_api_utils::context::ComflexContext;
use comflex_db_schema::source::community::{Community, CommunityInsertForm};
use comflex_db_views::{
  api::{CommunityResponse, CreateCommunity},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  utils::validation::{description_length_check, is_valid_community_name},
};
use tracing::info;

/// The creator becomes owner and first member. The community starts with one post type, "Default
/// Post".
#[tracing::instrument(skip(context))]
pub async fn create_community(
  data: Json<CreateCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<CommunityResponse>> {
  let person_id = local_user_view.person.id;
  let name = data.name.trim();
  is_valid_community_name(name)?;
  if let Some(description) = &data.description {
    description_length_check(description)?;
  }
  if Community::name_taken(&mut context.pool(), name).await? {
    Err(ComflexErrorType::CommunityAlreadyExists)?
  }

  let mut form = CommunityInsertForm::new(name.to_string(), person_id);
  form.is_public = data.is_public;
  form.description = data.description.clone();
  let community = Community::create_with_owner(&mut context.pool(), &form)
    .await
    .with_comflex_type(ComflexErrorType::CouldntCreateCommunity)?;
  info!("Created community {} ({})", community.name, community.id);

  let community_view =
    CommunityView::read(&mut context.pool(), community.id, Some(person_id)).await?;
  Ok(Json(CommunityResponse { community_view }))
}
