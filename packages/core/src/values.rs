mod binary;
pub use binary::*;

mod level;
pub use level::*;
