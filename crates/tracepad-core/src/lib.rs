//! # Tracepad Core
//!
//! Core types shared by every Tracepad crate: logical-space points, colors,
//! error types, canvas constants and thread-safe aliases.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

pub use color::{ParseColorError, Rgba};
pub use error::{AssetError, Error, Result, SurfaceError};
pub use geometry::Point;
pub use types::{thread_safe, ThreadSafe};
