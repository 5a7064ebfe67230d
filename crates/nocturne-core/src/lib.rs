//! Nocturne Core - Foundational types for the Nocturne effect engine
//!
//! This crate provides the core types that all other Nocturne crates depend on:
//! - `SurfaceId` - Opaque string keys naming rendering surfaces
//! - `Rgba` - Float RGBA color
//! - Error types and Result alias

mod color;
mod error;
mod id;

pub use color::Rgba;
pub use error::{NocturneError, Result};
pub use id::SurfaceId;
