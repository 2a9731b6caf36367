use actix_web::web::{Data, Json};
use chrono::Utc;
use comflex_api_utils::{
  context::ComflexContext,
  media::{collect_custom_fields, remove_stored_files, replaced_files},
  utils::{check_posting_author, read_posting},
};
use comflex_db_schema::{
  custom_fields::{posting_form, CustomFields},
  source::{
    post_type::PostTypeField,
    posting::{Posting, PostingUpdateForm},
  },
  traits::Crud,
};
use comflex_db_views::{
  api::{EditPosting, PostingResponse},
  structs::{LocalUserView, PostingView},
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  utils::validation::{description_length_check, is_valid_posting_name},
};

#[tracing::instrument(skip(context))]
pub async fn update_posting(
  data: Json<EditPosting>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostingResponse>> {
  let person_id = local_user_view.person.id;
  let posting = read_posting(&mut context.pool(), data.posting_id).await?;
  check_posting_author(person_id, &posting)?;

  let name = data.name.as_deref().map(str::trim);
  if let Some(name) = name {
    is_valid_posting_name(name)?;
  }
  if let Some(description) = &data.description {
    description_length_check(description)?;
  }

  // Values are checked against the fields the post type has now
  let custom_fields = match &data.custom_fields {
    Some(submitted) => {
      let fields =
        PostTypeField::list_for_post_type(&mut context.pool(), posting.post_type_id).await?;
      Some(collect_custom_fields(&posting_form(&fields), submitted, context.settings()).await?)
    }
    None => None,
  };

  let form = PostingUpdateForm {
    name: name.map(ToString::to_string),
    description: data.description.clone(),
    custom_fields: custom_fields.as_ref().map(CustomFields::encode).transpose()?,
    updated_at: Some(Some(Utc::now())),
  };
  let updated = Posting::update(&mut context.pool(), posting.id, &form).await;

  // Uploads that are not referenced after this call are removed
  if let Some(new_fields) = &custom_fields {
    let old_fields = CustomFields::decode(&posting.custom_fields);
    let unreferenced = match updated {
      Ok(_) => replaced_files(&old_fields, new_fields),
      Err(_) => replaced_files(new_fields, &old_fields),
    };
    remove_stored_files(&unreferenced, context.settings()).await;
  }
  updated.with_comflex_type(ComflexErrorType::CouldntUpdatePosting)?;

  let posting_view = PostingView::read(&mut context.pool(), posting.id, Some(person_id)).await?;
  Ok(Json(PostingResponse { posting_view }))
}
