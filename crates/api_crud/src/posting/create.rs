use actix_web::web::{Data, Json};
use comflex_api_utils::{
  context::ComflexContext,
  media::{collect_custom_fields, remove_stored_files},
  utils::{check_community_member, community_and_role, read_post_type},
};
use comflex_db_schema::{
  custom_fields::posting_form,
  source::{
    post_type::PostTypeField,
    posting::{Posting, PostingInsertForm},
  },
  traits::Crud,
};
use comflex_db_views::{
  api::{CreatePosting, PostingResponse},
  structs::{LocalUserView, PostingView},
};
use comflex_utils::{
  error::{ComflexErrorExt, ComflexErrorType, ComflexResult},
  utils::validation::{description_length_check, is_valid_posting_name},
};
use tracing::info;

/// Publishes a posting of a post type. Custom values are checked against the current fields of
/// that type, uploads are stored before the posting is written.
#[tracing::instrument(skip(context))]
pub async fn create_posting(
  data: Json<CreatePosting>,
  context: Data<ComflexContext>,
  local_user_view: LocalUserView,
) -> ComflexResult<Json<PostingResponse>> {
  let person_id = local_user_view.person.id;
  let post_type = read_post_type(&mut context.pool(), data.post_type_id).await?;
  let (community, role) =
    community_and_role(&mut context.pool(), post_type.community_id, &local_user_view).await?;
  check_community_member(role)?;

  let name = data.name.trim();
  is_valid_posting_name(name)?;
  if let Some(description) = &data.description {
    description_length_check(description)?;
  }

  let fields = PostTypeField::list_for_post_type(&mut context.pool(), post_type.id).await?;
  let submitted = data.custom_fields.clone().unwrap_or_default();
  let custom_fields =
    collect_custom_fields(&posting_form(&fields), &submitted, context.settings()).await?;

  let mut form = PostingInsertForm::new(community.id, post_type.id, person_id, name.to_string());
  form.description = data.description.clone();
  form.custom_fields = Some(custom_fields.encode()?);
  let posting = match Posting::create(&mut context.pool(), &form).await {
    Ok(posting) => posting,
    Err(e) => {
      remove_stored_files(&custom_fields.stored_files(), context.settings()).await;
      return Err(e).with_comflex_type(ComflexErrorType::CouldntCreatePosting);
    }
  };
  info!("Created posting {} in community {}", posting.id, community.id);

  let posting_view = PostingView::read(&mut context.pool(), posting.id, Some(person_id)).await?;
  Ok(Json(PostingResponse { posting_view }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::posting::{delete::delete_posting, list::list_postings, update::update_posting};
  use actix_web::web::Query;
  use base64::{engine::general_purpose::STANDARD, Engine};
  use comflex_db_schema::{
    custom_fields::CustomFieldValue,
    source::{
      community::{Community, CommunityInsertForm, CommunityMember, CommunityMemberForm},
      person::Person,
      post_type::{FieldDefinition, PostType},
    },
    traits::Joinable,
    FieldType,
  };
  use comflex_db_views::api::{DeletePosting, EditPosting, ListPostings};
  use pretty_assertions::assert_eq;
  use serde_json::json;
  use serial_test::serial;

  #[tokio::test]
  #[serial]
  async fn test_posting_lifecycle() -> ComflexResult<()> {
    let context = Data::new(ComflexContext::init_test_context().await);
    let pool = &mut context.pool();

    let owner = Person::register(pool, "hikers_owner", "hikers_password").await?;
    let member = Person::register(pool, "hikers_member", "hikers_password").await?;
    let outsider = Person::register(pool, "hikers_outsider", "hikers_password").await?;
    let form = CommunityInsertForm::new("Hikers".into(), owner.id);
    let hikers = Community::create_with_owner(pool, &form).await?;
    CommunityMember::join(pool, &CommunityMemberForm::new(hikers.id, member.id)).await?;

    let price = FieldDefinition {
      name: "Price".into(),
      field_type: FieldType::Number,
    };
    let offer = PostType::create_with_fields(pool, hikers.id, "Offer", &[price]).await?;

    let submitted = json!({ "price": "25", "ignored": true });
    let create = CreatePosting {
      post_type_id: offer.id,
      name: " Used boots ".into(),
      description: Some("Size 43".into()),
      custom_fields: submitted.as_object().cloned(),
    };
    let member_view = LocalUserView {
      person: member.clone(),
    };
    let created = create_posting(Json(create.clone()), context.clone(), member_view.clone())
      .await?
      .0
      .posting_view;
    assert_eq!("Used boots", created.posting.name);
    assert_eq!(
      Some(&CustomFieldValue::Number(25.0)),
      created.custom_fields.get("price")
    );
    assert_eq!(1, created.custom_fields.len());

    let outsider_view = LocalUserView {
      person: outsider.clone(),
    };
    let denied = create_posting(Json(create), context.clone(), outsider_view.clone()).await;
    assert_eq!(
      Some(ComflexErrorType::NotAMember),
      denied.err().map(|e| e.error_type)
    );

    let edit = EditPosting {
      posting_id: created.posting.id,
      name: Some("Boots".into()),
      ..Default::default()
    };
    let not_author = update_posting(Json(edit.clone()), context.clone(), outsider_view).await;
    assert_eq!(
      Some(ComflexErrorType::NotPostingAuthor),
      not_author.err().map(|e| e.error_type)
    );
    let updated = update_posting(Json(edit), context.clone(), member_view.clone())
      .await?
      .0
      .posting_view;
    assert_eq!("Boots", updated.posting.name);
    assert!(updated.posting.updated_at.is_some());
    // Custom values stay when the edit leaves them out
    assert_eq!(created.custom_fields, updated.custom_fields);

    let mine = ListPostings {
      mine: Some(true),
      ..Default::default()
    };
    let anonymous = list_postings(Query(mine), context.clone(), None).await;
    assert_eq!(
      Some(ComflexErrorType::NotLoggedIn),
      anonymous.err().map(|e| e.error_type)
    );
    let listed = list_postings(Query(mine), context.clone(), Some(member_view.clone()))
      .await?
      .0
      .postings;
    assert_eq!(vec![created.posting.id], listed.iter().map(|p| p.posting.id).collect::<Vec<_>>());

    let delete = DeletePosting {
      posting_id: created.posting.id,
    };
    delete_posting(Json(delete), context.clone(), member_view).await?;

    Community::delete(pool, hikers.id).await?;
    Person::delete(pool, owner.id).await?;
    Person::delete(pool, member.id).await?;
    Person::delete(pool, outsider.id).await?;
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_posting_uploads_are_removed() -> ComflexResult<()> {
    let context = Data::new(ComflexContext::init_test_context().await);
    let pool = &mut context.pool();
    let media_dir = std::path::PathBuf::from(&context.settings().media_dir);

    let owner = Person::register(pool, "photos_owner", "photos_password").await?;
    let form = CommunityInsertForm::new("Photographers".into(), owner.id);
    let photographers = Community::create_with_owner(pool, &form).await?;
    let photo = FieldDefinition {
      name: "Photo".into(),
      field_type: FieldType::Image,
    };
    let shot = PostType::create_with_fields(pool, photographers.id, "Shot", &[photo]).await?;
    let owner_view = LocalUserView {
      person: owner.clone(),
    };
    let photo_value = |file_name: &str| {
      json!({ "photo": { "file_name": file_name, "data": STANDARD.encode(b"jpeg") } })
        .as_object()
        .cloned()
    };
    let stored_photo = |view: &PostingView| match view.custom_fields.get("photo") {
      Some(CustomFieldValue::File(path)) => Ok(media_dir.join(path)),
      other => Err(ComflexErrorType::Unknown(format!("no stored photo: {other:?}"))),
    };

    let create = CreatePosting {
      post_type_id: shot.id,
      name: "Sunrise".into(),
      description: None,
      custom_fields: photo_value("sunrise.jpg"),
    };
    let created = create_posting(Json(create), context.clone(), owner_view.clone())
      .await?
      .0
      .posting_view;
    let first = stored_photo(&created)?;
    assert!(tokio::fs::try_exists(&first).await?);

    // A replaced image no longer keeps its file
    let edit = EditPosting {
      posting_id: created.posting.id,
      custom_fields: photo_value("sunset.jpg"),
      ..Default::default()
    };
    let updated = update_posting(Json(edit), context.clone(), owner_view.clone())
      .await?
      .0
      .posting_view;
    let second = stored_photo(&updated)?;
    assert!(!tokio::fs::try_exists(&first).await?);
    assert!(tokio::fs::try_exists(&second).await?);

    let delete = DeletePosting {
      posting_id: created.posting.id,
    };
    delete_posting(Json(delete), context.clone(), owner_view).await?;
    assert!(!tokio::fs::try_exists(&second).await?);

    Community::delete(pool, photographers.id).await?;
    Person::delete(pool, owner.id).await?;
    Ok(())
  }
}
