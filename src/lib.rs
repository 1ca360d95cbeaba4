//! Vietnamese food, drink, dessert and snack identification from photos.
//!
//! A single vision-language inference call produces free-form text; this
//! crate recovers JSON from it, validates the category-conditioned schema
//! and exposes the result over HTTP and a CLI.

pub mod config;
pub mod identify;
pub mod server;
