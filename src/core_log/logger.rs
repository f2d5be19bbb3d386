use log::{debug, info};
use std::sync::{Arc, RwLock};

/// Callback invoked with a formatted, human-readable message.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Two-level log fan-out for the embedding host.
///
/// Engine messages always go through the `log` facade; each level can
/// additionally feed a host-installed sink. No sink installed means the
/// facade is the only destination.
#[derive(Default)]
pub struct Logger {
    info_sink: RwLock<Option<LogSink>>,
    debug_sink: RwLock<Option<LogSink>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or clears the informational sink.
    pub fn set_info_sink(&self, sink: Option<LogSink>) {
        *self.info_sink.write().unwrap() = sink;
    }

    /// Installs or clears the diagnostic sink.
    pub fn set_debug_sink(&self, sink: Option<LogSink>) {
        *self.debug_sink.write().unwrap() = sink;
    }

    pub fn info(&self, message: &str) {
        info!("{}", message);
        if let Some(sink) = self.info_sink.read().unwrap().as_ref() {
            sink(message);
        }
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", message);
        if let Some(sink) = self.debug_sink.read().unwrap().as_ref() {
            sink(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn sinks_receive_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new();

        let sink_seen = seen.clone();
        logger.set_info_sink(Some(Arc::new(move |msg: &str| {
            sink_seen.lock().unwrap().push(msg.to_string());
        })));

        logger.info("client 1 connected");
        logger.debug("socket fd details");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["client 1 connected"]);
    }

    #[test]
    fn absent_sink_is_a_no_op() {
        let logger = Logger::new();
        logger.info("nobody listening");
        logger.debug("still nobody");
    }

    #[test]
    fn sinks_can_be_cleared() {
        let seen = Arc::new(Mutex::new(0u32));
        let logger = Logger::new();

        let sink_seen = seen.clone();
        logger.set_debug_sink(Some(Arc::new(move |_: &str| {
            *sink_seen.lock().unwrap() += 1;
        })));
        logger.debug("first");
        logger.set_debug_sink(None);
        logger.debug("second");

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
