pub mod context;
pub mod media;
pub mod utils;
