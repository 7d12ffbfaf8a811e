pub mod bookmarks;
pub mod clock;
pub mod ids;
