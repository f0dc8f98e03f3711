use std::fmt;

use bytes::Bytes;

use crate::group::KeyValues;

/// Discriminant of a [`PipelineEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    ByteArray,
    Log,
    Metric,
    Span,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ByteArray => "byte_array",
            EventType::Log => "log",
            EventType::Metric => "metric",
            EventType::Span => "span",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque payload. Nobody downstream of the source interprets these bytes.
pub type ByteArray = Bytes;

/// Structured log record: flat key/value contents plus a timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvent {
    pub timestamp_ns: u64,
    pub contents: KeyValues,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricEvent {
    pub name: String,
    pub timestamp_ns: u64,
    pub value: f64,
    pub tags: KeyValues,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanEvent {
    pub trace_id: String,
    pub span_id: String,
    pub name: String,
    pub start_ns: u64,
    pub end_ns: u64,
}

/// A single event flowing through the pipeline.
///
/// Which variants a consumer accepts is up to the consumer; converters
/// match on the variant and reject what they cannot serialize.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ByteArray(ByteArray),
    Log(LogEvent),
    Metric(MetricEvent),
    Span(SpanEvent),
}

impl PipelineEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            PipelineEvent::ByteArray(_) => EventType::ByteArray,
            PipelineEvent::Log(_) => EventType::Log,
            PipelineEvent::Metric(_) => EventType::Metric,
            PipelineEvent::Span(_) => EventType::Span,
        }
    }

    /// Shorthand for a byte-array event.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        PipelineEvent::ByteArray(data.into())
    }
}

impl From<Bytes> for PipelineEvent {
    fn from(data: Bytes) -> Self {
        PipelineEvent::ByteArray(data)
    }
}

impl From<Vec<u8>> for PipelineEvent {
    fn from(data: Vec<u8>) -> Self {
        PipelineEvent::ByteArray(Bytes::from(data))
    }
}

impl From<&'static [u8]> for PipelineEvent {
    fn from(data: &'static [u8]) -> Self {
        PipelineEvent::ByteArray(Bytes::from_static(data))
    }
}
