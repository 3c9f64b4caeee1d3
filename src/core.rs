pub mod catalog;
pub mod discovery;
pub mod document;
pub mod extraction;
pub mod means;
pub mod record;
pub mod source;
pub mod summary;
pub mod week;
