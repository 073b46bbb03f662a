//! Infrastructure layer - storage, hashing, mail and logging implementations

pub mod logging;
pub mod mail;
pub mod micropost;
pub mod storage;
pub mod user;
