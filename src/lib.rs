//! City board - track cities, add them through a debounced search overlay
//!
//! This library exposes the application's modules for testing.

pub mod action;
pub mod api;
pub mod client;
pub mod components;
pub mod debounce;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod validate;
