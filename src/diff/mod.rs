pub mod differ;
pub mod summary;
