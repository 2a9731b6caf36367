pub mod create;
pub mod delete;
pub mod field;
pub mod form;
pub mod list;
