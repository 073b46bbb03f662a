//! Micropost infrastructure module

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresMicropostRepository;
pub use repository::InMemoryMicropostRepository;
