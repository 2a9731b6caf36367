pub mod api;
pub mod community_view;
pub mod local_user_view;
pub mod post_type_view;
pub mod posting_view;
pub mod search;
pub mod structs;
