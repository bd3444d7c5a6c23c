// src/lib.rs
#![crate_type = "lib"]
#![crate_name = "linkward"]

// Core modules
pub mod application;
pub mod domain;
pub mod infrastructure;

// CLI modules
pub mod cli;
pub mod config;
pub mod exitcode;
pub mod util;

// Pure utilities, re-exported for embedding applications.
pub use domain::similarity::similarity;
pub use domain::url_norm::normalize_url;

#[cfg(test)]
mod tests {}
