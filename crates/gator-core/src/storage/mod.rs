mod database;
mod feed_repo;
#[cfg(test)]
pub(crate) mod memory;
mod post_repo;
mod repository;
mod sqlite;
mod user_repo;

pub use database::Database;
pub use feed_repo::FeedRepository;
pub use post_repo::PostRepository;
pub use repository::Repository;
pub use user_repo::UserRepository;
