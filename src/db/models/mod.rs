//! Database models split into domain-specific modules.

pub mod common;
pub mod ingredient;
pub mod recipe;
pub mod user;

pub use common::*;
pub use ingredient::*;
pub use recipe::*;
pub use user::*;
