#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_derive_newtype;
#[macro_use]
extern crate async_trait;

pub mod custom_fields;
pub mod impls;
pub mod newtypes;
pub mod source;
pub mod traits;
pub mod utils;

pub use comflex_db_schema_file::enums::{CommunitySortType, FieldType, PostingSortType};
