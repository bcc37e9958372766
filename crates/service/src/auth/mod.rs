//! Admin authentication: three-layer architecture (domain, repository, service).
//!
//! Back-office users log in with email and password; sessions are HS256 JWTs
//! minted and checked by [`token`].

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
