use std::sync::RwLock;
use zip_core::prelude::NetworkMode;

/// State shared between the actor and its handles. The actor is the only
/// writer; handles read.
pub struct ControllerStorage {
    mode: RwLock<NetworkMode>,
}

impl ControllerStorage {
    pub fn new() -> Self {
        Self {
            mode: RwLock::new(NetworkMode::NotReady),
        }
    }

    pub fn network_mode(&self) -> NetworkMode {
        *self.mode.read().expect("network mode lock poisoned")
    }

    pub(crate) fn set_network_mode(&self, mode: NetworkMode) {
        *self.mode.write().expect("network mode lock poisoned") = mode;
    }
}

impl Default for ControllerStorage {
    fn default() -> Self {
        Self::new()
    }
}
