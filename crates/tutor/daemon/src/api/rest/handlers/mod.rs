//! API request handlers

mod concepts;
mod health;
mod questions;

pub use concepts::*;
pub use health::*;
pub use questions::*;
