use crate::{Direction, LocalImmutableLogger, LogInfo, LogPayloadText, Loglevel, ToLogPayload};
use std::borrow::Cow;

pub struct ControllerLogger<'a> {
    inner: &'a dyn LocalImmutableLogger,
}

const LABEL: &str = "CNTRLR";

impl<'a> ControllerLogger<'a> {
    pub fn new(inner: &'a dyn LocalImmutableLogger) -> Self {
        Self { inner }
    }

    pub fn message_with_level(&self, message: impl Into<Cow<'static, str>>, level: Loglevel) {
        let log = LogInfo::builder()
            .label(LABEL)
            .payload(LogPayloadText::new(message).into())
            .build();
        self.inner.log(log, level);
    }

    pub fn error(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Error);
    }

    pub fn warn(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Warn);
    }

    pub fn info(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Info);
    }

    /// Logs a packet or command exchanged with the gateway
    pub fn command(&self, command: &impl ToLogPayload, direction: Direction) {
        let log = LogInfo::builder()
            .label(LABEL)
            .direction(direction)
            .payload(command.to_log_payload())
            .build();
        self.inner.log(log, Loglevel::Debug);
    }
}
