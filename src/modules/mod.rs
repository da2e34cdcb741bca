pub mod auth;
pub mod categories;
pub mod chapters;
pub mod courses;
pub mod media;
pub mod orders;
pub mod users;
