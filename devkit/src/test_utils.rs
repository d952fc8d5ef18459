/*!
Test helpers for scrape assertions

- [`LogCapture`]: tracing layer recording every event, installed per test
  with a thread-local default subscriber (use a current-thread runtime)
- [`SampleSet`]: lookups over the samples of one scrape
*/

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use redfish_exporter::collectors::Sample;

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}

#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route this thread's events into the capture until the guard drops
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.at_level(Level::ERROR)
    }

    pub fn warnings(&self) -> Vec<CapturedEvent> {
        self.at_level(Level::WARN)
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Samples of one scrape
pub struct SampleSet(pub Vec<Sample>);

impl SampleSet {
    pub fn count(&self, key: &str) -> usize {
        self.0.iter().filter(|s| s.key == key).count()
    }

    /// Samples whose key matches and whose label values start with `prefix`
    pub fn matching(&self, key: &str, prefix: &[&str]) -> Vec<&Sample> {
        self.0
            .iter()
            .filter(|s| s.key == key)
            .filter(|s| {
                s.labels.len() >= prefix.len()
                    && s.labels.iter().zip(prefix).all(|(have, want)| have == want)
            })
            .collect()
    }

    /// Value of the single sample matching `key` and `prefix`
    pub fn value(&self, key: &str, prefix: &[&str]) -> Option<f64> {
        match self.matching(key, prefix).as_slice() {
            [sample] => Some(sample.value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_capture_records_fields() {
        let capture = LogCapture::new();
        let _guard = capture.install();
        tracing::error!(chassis_id = %"1U", "Failed to get power information for chassis");
        tracing::debug!("ignored level is still captured");

        let errors = capture.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to get power information for chassis");
        assert_eq!(errors[0].field("chassis_id"), Some("1U"));
        assert_eq!(capture.events().len(), 2);
    }
}
