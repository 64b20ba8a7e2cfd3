use crate::error::Result;
use std::time::Instant;
use tokio::sync::oneshot;
use zip_cc::prelude::CC;

pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Sync + Send>;

/// A report someone waits for outside of a command cycle, e.g. the key and
/// DSK prompts during S2 inclusion or a wake-up notification.
pub(crate) struct AwaitedCC {
    pub timeout: Option<Instant>,
    pub predicate: Predicate<CC>,
    pub callback: oneshot::Sender<Result<CC>>,
}

impl AwaitedCC {
    pub fn matches(&self, cc: &CC) -> bool {
        (self.predicate)(cc)
    }
}
