pub mod community;
pub mod local_user;
pub mod post_type;
pub mod posting;
pub mod site;
