//! Repository traits

mod repositories;

pub use repositories::*;
