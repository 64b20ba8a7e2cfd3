pub use crate::commandclass::*;
pub use crate::commandclass_raw::CCRaw;
pub use crate::values::*;
