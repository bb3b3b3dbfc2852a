/// Filtered quake feed client: filter state, fetch lifecycle and view-state derivation
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod render;
pub mod services;
pub mod state;
pub mod utils;
