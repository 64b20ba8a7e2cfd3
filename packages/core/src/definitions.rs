mod command_classes;
pub use command_classes::*;

mod maybe_known;
pub use maybe_known::*;

mod device_class;
pub use device_class::*;

mod dsk;
pub use dsk::*;

mod network_mode;
pub use network_mode::*;

mod node_id;
pub use node_id::*;

mod notification;
pub use notification::*;

mod security;
pub use security::*;
