pub mod event;
pub mod group;

pub use event::{ByteArray, EventType, LogEvent, MetricEvent, PipelineEvent, SpanEvent};
pub use group::{GroupInfo, KeyValues, PipelineGroupEvents};
