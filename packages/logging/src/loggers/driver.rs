use crate::{
    Direction, LocalImmutableLogger, LogInfo, LogPayload, LogPayloadText, Loglevel, ToLogPayload,
};
use std::borrow::Cow;

pub struct DriverLogger<'a> {
    inner: &'a dyn LocalImmutableLogger,
}

const LABEL: &str = "DRIVER";

impl<'a> DriverLogger<'a> {
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

    pub fn verbose(&self, message: impl FnOnce() -> String) {
        self.message_with_level(message(), Loglevel::Verbose);
    }

    /// Logs a frame or command moving through the driver
    pub fn traffic(&self, what: &impl ToLogPayload, direction: Direction) {
        let log = LogInfo::builder()
            .label(LABEL)
            .direction(direction)
            .payload(what.to_log_payload())
            .build();
        self.inner.log(log, Loglevel::Debug);
    }

    pub fn payload(&self, payload: LogPayload, level: Loglevel) {
        let log = LogInfo::builder().label(LABEL).payload(payload).build();
        self.inner.log(log, level);
    }
}
