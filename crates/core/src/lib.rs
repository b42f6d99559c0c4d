//! Core business logic for kplanner.

pub mod services;

pub use services::*;
