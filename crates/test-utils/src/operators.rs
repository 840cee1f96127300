use std::sync::{Arc, Mutex};
use std::time::Duration;

use rund::operator::{Operator, OperatorFuture};

/// One entry in an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Finished(String),
}

/// Shared, synchronized log of operator start/finish events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Node names in the order they started.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Started(name) => Some(name),
                Event::Finished(_) => None,
            })
            .collect()
    }

    /// Node names in the order they finished.
    pub fn finished(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Finished(name) => Some(name),
                Event::Started(_) => None,
            })
            .collect()
    }

    pub fn start_count(&self, name: &str) -> usize {
        self.started().iter().filter(|n| n.as_str() == name).count()
    }

    /// Index of `event` in the log, if it was recorded.
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// Instrumented operator: records start/finish in an [`EventLog`], optionally
/// sleeps in between, and optionally fails.
#[derive(Debug, Clone)]
pub struct RecordingOperator {
    name: String,
    log: EventLog,
    delay: Duration,
    fail: bool,
}

impl RecordingOperator {
    pub fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Operator for RecordingOperator {
    fn run(&self) -> OperatorFuture<'_> {
        Box::pin(async move {
            self.log.record(Event::Started(self.name.clone()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.log.record(Event::Finished(self.name.clone()));

            if self.fail {
                anyhow::bail!("{} failed on purpose", self.name);
            }
            Ok(())
        })
    }
}
