pub mod client;
pub mod insights;
pub mod prompts;
pub mod types;

pub use client::*;
pub use insights::*;
pub use types::*;
