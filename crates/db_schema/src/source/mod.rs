pub mod community;
pub mod person;
pub mod post_type;
pub mod posting;
pub mod secret;
