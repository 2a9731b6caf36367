use actix_web::web::{Data, Json};
use chrono::Utc;
use comflex_api_utils::{
  context::ComflexContext,
  utils::{check_community_owner, community_and_role},
};
use comflex_db_schema::{
  source::community::{Community, CommunityUpdateForm},
  traits::Crud,
};
use comflex_db_views::{
  api::{CommunityResponse, EditCommunity},
  structs::{CommunityView, LocalUserView},
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  utils::validation::{description_length_check, is_valid_community_name},
};

#[tracing::instrument(skip(context))]
pub async fn update_community(
  data: Json<EditCommunity>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<CommunityResponse>> {
  let person_id = local_user_view.person.id;
  let (community, role) =
    community_and_role(&mut context.pool(), data.community_id, &local_user_view).await?;
  check_community_owner(role)?;

  let name = data.name.as_deref().map(str::trim);
  if let Some(name) = name {
    is_valid_community_name(name)?;
    let renamed = name.to_lowercase() != community.name.to_lowercase();
    if renamed && Community::name_taken(&mut context.pool(), name).await? {
      Err(ComflexErrorType::CommunityAlreadyExists)?
    }
  }
  if let Some(description) = &data.description {
    description_length_check(description)?;
  }

  let form = CommunityUpdateForm {
    name: name.map(ToString::to_string),
    is_public: data.is_public,
    description: data.description.clone(),
    updated_at: Some(Some(Utc::now())),
    ..Default::default()
  };
  Community::update(&mut context.pool(), community.id, &form)
    .await
    .with_comflex_type(ComflexErrorType::CouldntUpdateCommunity)?;

  let community_view =
    CommunityView::read(&mut context.pool(), community.id, Some(person_id)).await?;
  Ok(Json(CommunityResponse { community_view }))
}
