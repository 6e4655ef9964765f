//! Builds the composite sprite once at startup: two trimmed halves stacked
//! around a transparent band reserved for the name label.

pub mod compose;
pub mod error;

pub use compose::{compose, compose_from_paths, load_rgba, trim_transparent, Composite, Layout};
pub use error::AssetLoadError;
