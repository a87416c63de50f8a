use crate::domain::ports::Notifier;
use async_trait::async_trait;
use tracing::info;

/// Writes every message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
