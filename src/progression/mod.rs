//! Experience ladder and job advancement.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
