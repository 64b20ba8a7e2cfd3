use crate::{Direction, LocalImmutableLogger, LogInfo, LogPayloadText, Loglevel, ToLogPayload};
use std::borrow::Cow;
use zip_core::prelude::NodeId;

pub struct NodeLogger<'a> {
    inner: &'a dyn LocalImmutableLogger,
    node_id: NodeId,
}

const LABEL: &str = "NODE";

impl<'a> NodeLogger<'a> {
    pub fn new(inner: &'a dyn LocalImmutableLogger, node_id: NodeId) -> Self {
        Self { inner, node_id }
    }

    fn log_with_tag(&self, payload: crate::LogPayload, direction: Direction, level: Loglevel) {
        let log = LogInfo::builder()
            .label(LABEL)
            .direction(direction)
            .secondary_tag(Cow::Owned(self.node_id.to_string()))
            .payload(payload)
            .build();
        self.inner.log(log, level);
    }

    pub fn message_with_level(&self, message: impl Into<Cow<'static, str>>, level: Loglevel) {
        self.log_with_tag(
            LogPayloadText::new(message).into(),
            Direction::None,
            level,
        );
    }

    pub fn error(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Error);
    }

    pub fn info(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Info);
    }

    /// Logs a command exchanged with this node
    pub fn command(&self, command: &impl ToLogPayload, direction: Direction) {
        self.log_with_tag(command.to_log_payload(), direction, Loglevel::Debug);
    }
}
