//! Core library for ShopDash
//!
//! This crate contains the domain logic for the multi-tenant
//! e-commerce dashboard backend, including:
//! - Platform registry and credential shape validation
//! - Remote credential authentication probes
//! - Symmetric credential codec
//! - Credential persistence and the intake pipeline

pub mod credential;
pub mod crypto;
pub mod error;
pub mod platform;
pub mod remote;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
