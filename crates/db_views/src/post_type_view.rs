use crate::structs::PostTypeView;
use comflex_db_schema::{
  custom_fields::{posting_form, PostingFormField},
  newtypes::{CommunityId, PostTypeId},
  source::post_type::{PostType, PostTypeField},
  utils::DbPool,
};
use diesel::result::Error;

impl PostTypeView {
  pub async fn read(pool: &mut DbPool<'_>, post_type_id: PostTypeId) -> Result<Self, Error> {
    let post_type = PostType::read(pool, post_type_id).await?;
    let fields = PostTypeField::list_for_post_type(pool, post_type_id).await?;
    Ok(Self { post_type, fields })
  }

  /// Every post type of a community with its fields, oldest type first.
  pub async fn list_for_community(
    pool: &mut DbPool<'_>,
    community_id: CommunityId,
  ) -> Result<Vec<Self>, Error> {
    let post_types = PostType::list_for_community(pool, community_id).await?;
    let mut views = Vec::with_capacity(post_types.len());
    for post_type in post_types {
      let fields = PostTypeField::list_for_post_type(pool, post_type.id).await?;
      views.push(Self { post_type, fields });
    }
    Ok(views)
  }

  /// The fields a client has to render to submit a posting of this type.
  pub fn posting_form(&self) -> Vec<PostingFormField> {
    posting_form(&self.fields)
  }
}
