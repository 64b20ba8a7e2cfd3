pub use crate::binding::{UdpBinding, UdpBindingConfig, ZipBinding};
pub use crate::consts::*;
pub use crate::error::{Error, Result};
pub use crate::frame::{KeepAlive, ZipFrame};
pub use crate::packet::{Packet, PacketFlags, PacketRaw};
