//! # StoryMap Core
//!
//! The domain layer of the StoryMap backend: geotagged story posts,
//! the moderation workflow, and the ports the infrastructure implements.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
