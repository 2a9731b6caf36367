pub mod community;
pub mod posting;
pub mod user;
