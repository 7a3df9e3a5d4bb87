//! Logging capability injected into the engine.

/// Sink for the engine's user-facing messages.
pub trait MigrationLogger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// [`MigrationLogger`] forwarding to the `log` facade under the `dm::migrate` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

pub const LOG_TARGET: &str = "dm::migrate";

impl MigrationLogger for LogLogger {
    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        log::error!(target: LOG_TARGET, "{}", message);
    }
}
