pub mod controller;
pub mod error;

pub use controller::*;
pub use error::{Error, Result};
