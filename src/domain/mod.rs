//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only value types, trait definitions and domain error types.

pub mod errors;
pub mod money;
pub mod repositories;

pub use errors::DomainError;
pub use money::Money;
pub use repositories::*;
