pub mod definitions;
pub mod log;
pub mod parse;
pub mod prelude;
pub mod serialize;
pub mod state_machine;
pub mod util;
pub mod values;
pub mod wrapping_counter;
