//! Capture of `cachegate.*` spans for assertions in tests.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::Dispatch;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

const PREFIX: &str = "cachegate.";

/// Captured span information.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    /// Span name, e.g. "cachegate.decide"
    pub name: String,
    /// Span target, e.g. "cachegate_core::decision"
    pub target: String,
    /// Field values rendered as strings, in recording order
    pub fields: Vec<(String, String)>,
    id: u64,
}

impl CapturedSpan {
    /// Value of a field, if recorded.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct FieldVisitor {
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }
}

struct SpanCaptureLayer {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl<S> Layer<S> for SpanCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let metadata = attrs.metadata();
        if !metadata.name().starts_with(PREFIX) {
            return;
        }

        let mut visitor = FieldVisitor { fields: Vec::new() };
        attrs.record(&mut visitor);

        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedSpan {
                name: metadata.name().to_string(),
                target: metadata.target().to_string(),
                fields: visitor.fields,
                id: id.into_u64(),
            });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span_ref) = ctx.span(id) else {
            return;
        };
        if !span_ref.metadata().name().starts_with(PREFIX) {
            return;
        }

        let mut visitor = FieldVisitor { fields: Vec::new() };
        values.record(&mut visitor);

        let span_id = id.into_u64();
        let mut spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(captured) = spans.iter_mut().rev().find(|s| s.id == span_id) {
            for (key, value) in visitor.fields {
                if let Some(existing) = captured.fields.iter_mut().find(|(k, _)| k == &key) {
                    existing.1 = value;
                } else {
                    captured.fields.push((key, value));
                }
            }
        }
    }

    fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {}
}

/// Collector for captured spans.
#[derive(Clone)]
pub struct SpanCollector {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    dispatch: Dispatch,
}

/// Creates a span collector with its own dispatch.
///
/// Run the code under test inside
/// `tracing::dispatcher::with_default(collector.dispatch(), ..)`.
pub fn create_span_collector() -> SpanCollector {
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCaptureLayer {
        spans: spans.clone(),
    };
    let subscriber = Registry::default().with(layer);
    SpanCollector {
        spans,
        dispatch: Dispatch::new(subscriber),
    }
}

impl SpanCollector {
    /// The dispatch to install while running code under test.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// All captured spans.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last span with the given name.
    pub fn get_span(&self, name: &str) -> Option<CapturedSpan> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|s| s.name == name)
            .cloned()
    }
}
