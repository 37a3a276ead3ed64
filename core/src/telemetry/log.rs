use log::{debug, info};

/// Log facade scoped to one named component.
#[derive(Debug, Clone)]
pub struct LogManager {
    scope: String,
}

impl LogManager {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.scope, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("aracore")
    }
}
