//! Repository implementations using SeaORM

pub mod content_repository;
pub mod engagement_repository;
pub mod local_store;
pub mod profile_repository;
pub mod signup_repository;

pub use content_repository::SeaOrmContentRepository;
pub use engagement_repository::SeaOrmEngagementRepository;
pub use local_store::{MemoryLocalStore, SeaOrmLocalStore};
pub use profile_repository::SeaOrmProfileRepository;
pub use signup_repository::SeaOrmSignupRepository;
