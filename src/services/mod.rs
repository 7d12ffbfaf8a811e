pub mod bookmark_store;
pub mod seed;
