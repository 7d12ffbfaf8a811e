//! Yes/no and message prompts shown to the user.
//!
//! How a prompt is drawn belongs to the host. The controller only needs to
//! await an answer, and at most one prompt may be waiting at any time.

use async_trait::async_trait;
use tokio::sync::Mutex;

#[async_trait]
pub trait Prompt: Send + Sync {
    /// Asks whether `subject` may be deleted. `detail` adds context such as
    /// how many links go with it. Dismissing counts as `false`.
    async fn confirm(&self, subject: &str, detail: Option<&str>) -> bool;

    async fn notify(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("another prompt is still waiting for an answer")]
pub struct PromptBusy;

/// Single-slot wrapper: a second request while one is pending is refused
/// instead of stacking dialogs.
pub struct PromptGate<P> {
    inner: P,
    slot: Mutex<()>,
}

impl<P: Prompt> PromptGate<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            slot: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub async fn confirm(&self, subject: &str, detail: Option<&str>) -> Result<bool, PromptBusy> {
        let _pending = self.slot.try_lock().map_err(|_| PromptBusy)?;
        Ok(self.inner.confirm(subject, detail).await)
    }

    pub async fn notify(&self, message: &str) -> Result<(), PromptBusy> {
        let _pending = self.slot.try_lock().map_err(|_| PromptBusy)?;
        self.inner.notify(message).await;
        Ok(())
    }
}
