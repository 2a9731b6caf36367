use crate::{
  custom_fields::is_fixed_name,
  newtypes::{CommunityId, PostTypeFieldId, PostTypeId},
  source::post_type::{
    FieldDefinition,
    PostType,
    PostTypeField,
    PostTypeFieldInsertForm,
    PostTypeInsertForm,
    FIXED_FIELDS,
  },
  utils::{functions::lower, get_conn, DbPool},
};
use comflex_db_schema_file::{
  enums::FieldType,
  schema::{post_type, post_type_field},
};
use comflex_utils::{
  error::{ComflexErrorType, ComflexResult},
  utils::validation::is_valid_field_name,
};
use diesel::{
  dsl::{exists, insert_into},
  result::Error,
  select,
  ExpressionMethods,
  QueryDsl,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};
use std::collections::HashSet;

impl PostType {
  /// Inserts the post type, its two fixed fields and then `extra_fields`, all or nothing.
  pub async fn create_with_fields(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    name: &str,
    extra_fields: &[FieldDefinition],
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    let form = PostTypeInsertForm::new(community_id, name.trim().to_string());
    conn
      .transaction::<_, Error, _>(|conn| {
        async move {
          let post_type_ = insert_into(post_type::table)
            .values(&form)
            .get_result::<Self>(conn)
            .await?;

          let fixed = FIXED_FIELDS.iter().map(|name| PostTypeFieldInsertForm {
            post_type_id: post_type_.id,
            name: (*name).to_string(),
            field_type: FieldType::Text,
            is_fixed: Some(true),
          });
          let extra = extra_fields.iter().map(|f| {
            PostTypeFieldInsertForm::new(post_type_.id, f.name.trim().to_string(), f.field_type)
          });
          // One statement keeps the insertion order, and with it the field order
          let forms: Vec<_> = fixed.chain(extra).collect();
          insert_into(post_type_field::table)
            .values(forms)
            .execute(conn)
            .await?;

          Ok(post_type_)
        }
        .scope_boxed()
      })
      .await
  }

  pub async fn read(pool: &mut DbPool<'_>, post_type_id: PostTypeId) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    post_type::table.find(post_type_id).first(conn).await
  }

  /// Its fields and postings are removed as well.
  pub async fn delete(pool: &mut DbPool<'_>, post_type_id: PostTypeId) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(post_type::table.find(post_type_id))
      .execute(conn)
      .await
  }

  pub async fn list_for_community(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
  ) -> Result<Vec<Self>, Error> {
    let conn = &mut get_conn(pool).await?;
    post_type::table
      .filter(post_type::community_id.eq(community_id))
      .order_by(post_type::id)
      .load::<Self>(conn)
      .await
  }

  pub async fn name_taken(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
    name: &str,
  ) -> Result<bool, Error> {
    let conn = &mut get_conn(pool).await?;
    select(exists(
      post_type::table
        .filter(post_type::community_id.eq(community_id))
        .filter(lower(post_type::name).eq(name.trim().to_lowercase())),
    ))
    .get_result(conn)
    .await
  }
}

impl PostTypeField {
  pub async fn create(
    pool: &mut DbPool<'_>,
    form: &PostTypeFieldInsertForm,
  ) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    insert_into(post_type_field::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
  }

  pub async fn read(pool: &mut DbPool<'_>, field_id: PostTypeFieldId) -> Result<Self, Error> {
    let conn = &mut get_conn(pool).await?;
    post_type_field::table.find(field_id).first(conn).await
  }

  /// Fixed fields are never deleted.
  pub async fn delete(pool: &mut DbPool<'_>, field_id: PostTypeFieldId) -> Result<usize, Error> {
    let conn = &mut get_conn(pool).await?;
    diesel::delete(
      post_type_field::table
        .find(field_id)
        .filter(post_type_field::is_fixed.eq(false)),
    )
    .execute(conn)
    .await
  }

  /// Fields in schema order, fixed fields first.
  pub async fn list_for_post_type(
    pool: &mut DbPool<'_>,
    post_type_id: PostTypeId,
  ) -> Result<Vec<Self>, Error> {
    let conn = &mut get_conn(pool).await?;
    post_type_field::table
      .filter(post_type_field::post_type_id.eq(post_type_id))
      .order_by(post_type_field::id)
      .load::<Self>(conn)
      .await
  }
}

/// Checks new field definitions against each other and against the existing field names. Names
/// must be valid, must not repeat a fixed field and must be unique ignoring case.
pub fn validate_field_definitions(
  existing: &[PostTypeField],
  new_fields: &[FieldDefinition],
) -> ComflexResult<()> {
  let mut seen: HashSet<String> = existing.iter().map(|f| f.name.to_lowercase()).collect();
  for field in new_fields {
    is_valid_field_name(&field.name)?;
    let key = field.name.trim().to_lowercase();
    if is_fixed_name(&key) || !seen.insert(key) {
      Err(ComflexErrorType::DuplicateFieldName(field.name.trim().to_string()))?
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    source::{
      community::{Community, CommunityInsertForm},
      person::Person,
      post_type::{DESCRIPTION_FIELD, TITLE_FIELD},
    },
    traits::Crud,
    utils::build_db_pool_for_tests,
  };
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  fn definition(name: &str, field_type: FieldType) -> FieldDefinition {
    FieldDefinition {
      name: name.to_string(),
      field_type,
    }
  }

  #[test]
  fn test_validate_field_definitions() -> ComflexResult<()> {
    validate_field_definitions(
      &[],
      &[
        definition("Price", FieldType::Number),
        definition("Start", FieldType::Date),
      ],
    )?;

    let duplicate = validate_field_definitions(
      &[],
      &[
        definition("Price", FieldType::Number),
        definition("price", FieldType::Text),
      ],
    );
    assert_eq!(
      Some(ComflexErrorType::DuplicateFieldName("price".into())),
      duplicate.err().map(|e| e.error_type)
    );

    let fixed = validate_field_definitions(&[], &[definition("Post Title", FieldType::Text)]);
    assert_eq!(
      Some(ComflexErrorType::DuplicateFieldName("Post Title".into())),
      fixed.err().map(|e| e.error_type)
    );

    let empty = validate_field_definitions(&[], &[definition(" ", FieldType::Text)]);
    assert_eq!(
      Some(ComflexErrorType::InvalidFieldName),
      empty.err().map(|e| e.error_type)
    );
    Ok(())
  }

  #[tokio::test]
  #[serial]
  async fn test_create_with_fields() -> ComflexResult<()> {
    let pool = &build_db_pool_for_tests().await;
    let pool = &mut pool.into();

    let owner = Person::register(pool, "post_type_owner", "post_type_password").await?;
    let form = CommunityInsertForm::new("Market".into(), owner.id);
    let market = Community::create_with_owner(pool, &form).await?;

    let extra = vec![
      definition("Price", FieldType::Number),
      definition("Photo", FieldType::Image),
    ];
    let offer = PostType::create_with_fields(pool, market.id, "Offer", &extra).await?;
    assert!(PostType::name_taken(pool, market.id, "offer").await?);

    let fields = PostTypeField::list_for_post_type(pool, offer.id).await?;
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(vec![TITLE_FIELD, DESCRIPTION_FIELD, "Price", "Photo"], names);
    let fixed: Vec<_> = fields.iter().map(|f| f.is_fixed).collect();
    assert_eq!(vec![true, true, false, false], fixed);

    // Fixed fields stay
    let title = <[_]>::first(&fields).ok_or(Error::NotFound)?;
    assert_eq!(0, PostTypeField::delete(pool, title.id).await?);
    let photo = fields.get(3).ok_or(Error::NotFound)?;
    assert_eq!(1, PostTypeField::delete(pool, photo.id).await?);

    assert_eq!(1, PostType::delete(pool, offer.id).await?);
    assert!(PostTypeField::list_for_post_type(pool, offer.id)
      .await?
      .is_empty());

    Community::delete(pool, market.id).await?;
    Person::delete(pool, owner.id).await?;
    Ok(())
  }
}
