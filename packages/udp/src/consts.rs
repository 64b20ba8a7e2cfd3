/// The UDP port Z/IP gateways listen on
pub const GATEWAY_UDP_PORT: u16 = 4123;

/// The local UDP port this client binds by default
pub const DEFAULT_LOCAL_PORT: u16 = 4000;

/// Command class / command bytes of the Z/IP packet envelope
pub const ZIP_PACKET_COMMAND: u8 = 0x02;
pub const ZIP_KEEP_ALIVE_COMMAND: u8 = 0x03;
