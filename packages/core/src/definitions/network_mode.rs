use std::fmt::Display;

/// The process-wide mode of the network coordinator. At most one mode-changing
/// operation runs at a time; ordinary device commands require
/// [NetworkMode::Idle] or [NetworkMode::ConfiguringNewNode].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// The coordinator has not finished starting up, or the transport is gone
    #[default]
    NotReady,
    Idle,
    IncludingNode,
    ExcludingNode,
    /// A node was just added and is being configured. Device traffic is allowed,
    /// but commands to sleeping nodes are not queued in this mode.
    ConfiguringNewNode,
    LearnMode,
    DefaultSetting,
}

impl NetworkMode {
    /// Whether a command in this mode changes the network topology
    pub fn is_mode_changing(&self) -> bool {
        matches!(
            self,
            Self::IncludingNode | Self::ExcludingNode | Self::LearnMode | Self::DefaultSetting
        )
    }
}

impl Display for NetworkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "not ready"),
            Self::Idle => write!(f, "idle"),
            Self::IncludingNode => write!(f, "including node"),
            Self::ExcludingNode => write!(f, "excluding node"),
            Self::ConfiguringNewNode => write!(f, "configuring new node"),
            Self::LearnMode => write!(f, "learn mode"),
            Self::DefaultSetting => write!(f, "resetting to default"),
        }
    }
}
