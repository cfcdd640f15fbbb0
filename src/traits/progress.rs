/// Sink for progress messages, one per major generation phase.
pub trait ProgressCallback: Send + Sync {
    fn start_task(&self, message: &str);
}

/// Default sink; reports each phase through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn start_task(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn start_task(&self, _message: &str) {}
}
