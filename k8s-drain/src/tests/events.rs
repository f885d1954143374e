use std::sync::Arc;
use std::sync::Mutex;

use tracing::field::Field;
use tracing::field::Visit;
use tracing::subscriber::DefaultGuard;
use tracing::Event;
use tracing::Subscriber;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Layer;

use super::*;

/// Collects the message of every event emitted on this thread while the
/// returned guard is alive.
#[derive(Clone, Debug, Default)]
pub(super) struct Messages {
    recorded: Arc<Mutex<Vec<String>>>,
}

impl Messages {
    pub(super) fn capture() -> (Self, DefaultGuard) {
        let messages = Self::default();
        let guard = tracing_subscriber::registry()
            .with(messages.clone())
            .set_default();
        (messages, guard)
    }

    pub(super) fn count(&self, message: &str) -> usize {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .filter(|recorded| *recorded == message)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for Messages {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.recorded.lock().unwrap().push(message);
        }
    }
}

#[derive(Debug, Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}
