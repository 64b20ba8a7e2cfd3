pub use crate::definitions::*;
pub use crate::log::{
    LogPayload, LogPayloadDict, LogPayloadDictValue, LogPayloadList, LogPayloadText, ToLogPayload,
};
pub use crate::parse::{Parsable, ParseError, ParseResult, Parser};
pub use crate::serialize::Serializable;
pub use crate::values::*;
