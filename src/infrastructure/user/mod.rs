//! User infrastructure module
//!
//! Argon2 digests, random tokens, in-memory and PostgreSQL repositories, and
//! the account service that ties them to the mailer.

mod password;
mod postgres_repository;
mod repository;
mod service;
mod token;

pub use password::{Argon2Hasher, DigestHasher, HashCost};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    Registration, ResetPasswordRequest, SignUpRequest, UpdateProfileRequest, UserService,
    USERS_PER_PAGE,
};
pub use token::{new_token, TokenGenerator, UrlSafeTokenGenerator, TOKEN_BYTES};
