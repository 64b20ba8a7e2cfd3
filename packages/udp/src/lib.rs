pub mod binding;
pub mod consts;
pub mod error;
pub mod frame;
pub mod packet;
pub mod prelude;
