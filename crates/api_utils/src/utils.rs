use actix_web::{
  cookie::{Cookie, SameSite},
  http::header::AUTHORIZATION,
  HttpRequest,
};
use comflex_db_schema::{
  newtypes::{CommunityId, PersonId, PostTypeId, PostingId},
  source::{
    community::{Community, CommunityRole},
    post_type::PostType,
    posting::Posting,
  },
  traits::Crud,
  utils::DbPool,
};
use comflex_db_views::structs::LocalUserView;
use comflex_utils::error::{ComflexErrorExt, ComflexErrorType, ComflexResult};
use tracing::debug;

pub const AUTH_COOKIE_NAME: &str = "auth";

/// Reads the login token from the `auth` header, a bearer `Authorization` header or the `auth`
/// cookie, in that order.
pub fn read_auth_token(req: &HttpRequest) -> Option<String> {
  let headers = req.headers();
  if let Some(jwt) = headers.get(AUTH_COOKIE_NAME).and_then(|h| h.to_str().ok()) {
    return Some(jwt.to_string());
  }
  let bearer = headers
    .get(AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .and_then(|h| h.strip_prefix("Bearer "));
  if let Some(jwt) = bearer {
    return Some(jwt.to_string());
  }
  req.cookie(AUTH_COOKIE_NAME).map(|c| c.value().to_string())
}

pub fn create_login_cookie(jwt: String) -> Cookie<'static> {
  let mut cookie = Cookie::new(AUTH_COOKIE_NAME, jwt);
  cookie.set_secure(true);
  cookie.set_same_site(SameSite::Lax);
  cookie.set_http_only(true);
  cookie.set_path("/");
  cookie
}

pub async fn read_community(
  pool: &mut DbPool<'_>,
  community_id: CommunityId,
) -> ComflexResult<Community> {
  Community::read(pool, community_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindCommunity)
}

pub async fn read_post_type(
  pool: &mut DbPool<'_>,
  post_type_id: PostTypeId,
) -> ComflexResult<PostType> {
  PostType::read(pool, post_type_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindPostType)
}

pub async fn read_posting(pool: &mut DbPool<'_>, posting_id: PostingId) -> ComflexResult<Posting> {
  Posting::read(pool, posting_id)
    .await
    .with_comflex_type(ComflexErrorType::CouldntFindPosting)
}

/// Reads the community and the role the requester holds in it.
#[tracing::instrument(skip_all)]
pub async fn community_and_role(
  pool: &mut DbPool<'_>,
  community_id: CommunityId,
  local_user_view: &LocalUserView,
) -> ComflexResult<(Community, CommunityRole)> {
  let community = read_community(pool, community_id).await?;
  let role = CommunityRole::read(pool, &community, local_user_view.person.id).await?;
  Ok((community, role))
}

/// Private communities are only open to their members.
pub async fn check_community_visible(
  pool: &mut DbPool<'_>,
  community: &Community,
  person_id: Option<PersonId>,
) -> ComflexResult<()> {
  if community.is_public {
    return Ok(());
  }
  let role = match person_id {
    Some(person_id) => CommunityRole::read(pool, community, person_id).await?,
    None => CommunityRole::Outsider,
  };
  check_community_member(role)
}

pub fn check_community_owner(role: CommunityRole) -> ComflexResult<()> {
  if !role.is_owner() {
    debug!("Denied, {:?} is not the owner", role);
    Err(ComflexErrorType::NotCommunityOwner)?
  }
  Ok(())
}

pub fn check_owner_or_moderator(role: CommunityRole) -> ComflexResult<()> {
  if !role.is_owner_or_moderator() {
    debug!("Denied, {:?} is neither owner nor moderator", role);
    Err(ComflexErrorType::NotOwnerOrModerator)?
  }
  Ok(())
}

pub fn check_community_member(role: CommunityRole) -> ComflexResult<()> {
  if !role.is_member() {
    debug!("Denied, not a member");
    Err(ComflexErrorType::NotAMember)?
  }
  Ok(())
}

pub fn check_posting_author(person_id: PersonId, posting: &Posting) -> ComflexResult<()> {
  if posting.creator_id != person_id {
    debug!("Denied, {} did not write posting {}", person_id, posting.id);
    Err(ComflexErrorType::NotPostingAuthor)?
  }
  Ok(())
}

pub fn check_can_leave(role: CommunityRole) -> ComflexResult<()> {
  match role {
    CommunityRole::Owner => Err(ComflexErrorType::OwnerCannotLeave)?,
    CommunityRole::Outsider => Err(ComflexErrorType::NotAMember)?,
    CommunityRole::Moderator | CommunityRole::Member => Ok(()),
  }
}

pub fn check_can_dismiss(actor: CommunityRole, target: CommunityRole) -> ComflexResult<()> {
  check_owner_or_moderator(actor)?;
  if !actor.can_dismiss(target) {
    debug!("Denied, {:?} cannot dismiss {:?}", actor, target);
    Err(ComflexErrorType::CannotDismissMember)?
  }
  Ok(())
}

/// Removing a moderator only needs the owner, appointing one needs a member as target.
pub fn check_can_set_moderator(
  actor: CommunityRole,
  target: CommunityRole,
  added: bool,
) -> ComflexResult<()> {
  check_community_owner(actor)?;
  if target == CommunityRole::Owner {
    Err(ComflexErrorType::OwnerCannotBeModerator)?
  }
  if added && !actor.can_promote(target) {
    Err(ComflexErrorType::NotAMember)?
  }
  Ok(())
}

pub fn check_can_transfer(
  actor: CommunityRole,
  actor_id: PersonId,
  new_owner_id: PersonId,
  new_owner_role: CommunityRole,
) -> ComflexResult<()> {
  check_community_owner(actor)?;
  if actor_id == new_owner_id {
    Err(ComflexErrorType::CannotTransferToSelf)?
  }
  if !new_owner_role.is_member() {
    Err(ComflexErrorType::NewOwnerMustBeMember)?
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;
  use chrono::Utc;
  use pretty_assertions::assert_eq;
  use CommunityRole::*;

  fn error_type(res: ComflexResult<()>) -> Option<ComflexErrorType> {
    res.err().map(|e| e.error_type)
  }

  #[test]
  fn test_read_auth_token() {
    let header = TestRequest::default()
      .insert_header((AUTH_COOKIE_NAME, "from-header"))
      .to_http_request();
    assert_eq!(Some("from-header".to_string()), read_auth_token(&header));

    let bearer = TestRequest::default()
      .insert_header((AUTHORIZATION, "Bearer from-bearer"))
      .to_http_request();
    assert_eq!(Some("from-bearer".to_string()), read_auth_token(&bearer));

    let cookie = TestRequest::default()
      .cookie(create_login_cookie("from-cookie".into()))
      .to_http_request();
    assert_eq!(Some("from-cookie".to_string()), read_auth_token(&cookie));

    assert_eq!(None, read_auth_token(&TestRequest::default().to_http_request()));
  }

  #[test]
  fn test_leave() {
    assert_eq!(Some(ComflexErrorType::OwnerCannotLeave), error_type(check_can_leave(Owner)));
    assert_eq!(Some(ComflexErrorType::NotAMember), error_type(check_can_leave(Outsider)));
    assert!(check_can_leave(Moderator).is_ok());
    assert!(check_can_leave(Member).is_ok());
  }

  #[test]
  fn test_dismiss() {
    assert!(check_can_dismiss(Owner, Moderator).is_ok());
    assert!(check_can_dismiss(Moderator, Member).is_ok());
    assert_eq!(
      Some(ComflexErrorType::CannotDismissMember),
      error_type(check_can_dismiss(Moderator, Owner))
    );
    assert_eq!(
      Some(ComflexErrorType::CannotDismissMember),
      error_type(check_can_dismiss(Moderator, Moderator))
    );
    assert_eq!(
      Some(ComflexErrorType::NotOwnerOrModerator),
      error_type(check_can_dismiss(Member, Member))
    );
  }

  #[test]
  fn test_set_moderator() {
    assert!(check_can_set_moderator(Owner, Member, true).is_ok());
    assert!(check_can_set_moderator(Owner, Moderator, false).is_ok());
    assert_eq!(
      Some(ComflexErrorType::NotAMember),
      error_type(check_can_set_moderator(Owner, Outsider, true))
    );
    assert_eq!(
      Some(ComflexErrorType::OwnerCannotBeModerator),
      error_type(check_can_set_moderator(Owner, Owner, true))
    );
    assert_eq!(
      Some(ComflexErrorType::NotCommunityOwner),
      error_type(check_can_set_moderator(Moderator, Member, true))
    );
  }

  #[test]
  fn test_transfer() {
    let (me, other) = (PersonId(1), PersonId(2));
    assert!(check_can_transfer(Owner, me, other, Member).is_ok());
    assert!(check_can_transfer(Owner, me, other, Moderator).is_ok());
    assert_eq!(
      Some(ComflexErrorType::CannotTransferToSelf),
      error_type(check_can_transfer(Owner, me, me, Owner))
    );
    assert_eq!(
      Some(ComflexErrorType::NewOwnerMustBeMember),
      error_type(check_can_transfer(Owner, me, other, Outsider))
    );
    assert_eq!(
      Some(ComflexErrorType::NotCommunityOwner),
      error_type(check_can_transfer(Moderator, me, other, Member))
    );
  }

  #[test]
  fn test_posting_author() {
    let posting = Posting {
      id: PostingId(3),
      community_id: CommunityId(1),
      post_type_id: PostTypeId(1),
      creator_id: PersonId(1),
      name: "Bike".into(),
      description: String::new(),
      custom_fields: "{}".into(),
      published_at: Utc::now(),
      updated_at: None,
      likes: 0,
      dislikes: 0,
    };
    assert!(check_posting_author(PersonId(1), &posting).is_ok());
    assert_eq!(
      Some(ComflexErrorType::NotPostingAuthor),
      error_type(check_posting_author(PersonId(2), &posting))
    );
  }
}
