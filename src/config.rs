//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema (anchor instant, media
//! location, library filters, playback policy) and helpers to load it from
//! disk and the environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
