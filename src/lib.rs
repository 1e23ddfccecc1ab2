pub mod atom;
pub mod configuration;
pub mod constant;
pub mod error;
pub mod maths;
pub mod polarizability;
pub mod species;
pub mod state;
mod summary;
pub mod term;
pub mod transition;
pub mod units;

pub use error::{Error, Result};
