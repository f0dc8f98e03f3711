use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use tributary_models::PipelineGroupEvents;

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::fields::{FieldValues, find_target_fields_in_group};
use crate::pool::{BufferPool, stream_pool};
use crate::raw::write_raw_stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Byte-array payloads joined with `\n`.
    Raw,
}

impl FromStr for Protocol {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Protocol::Raw),
            other => Err(ConvertError::UnsupportedProtocol(other.to_owned())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Raw => f.write_str("raw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Protocol-specific framing, no general-purpose codec.
    Custom,
}

impl Encoding {
    /// Parse an encoding name in the context of `protocol`.
    pub fn parse_for(protocol: Protocol, name: &str) -> Result<Self, ConvertError> {
        match (protocol, name) {
            (Protocol::Raw, "custom") => Ok(Encoding::Custom),
            _ => Err(ConvertError::UnsupportedEncoding {
                protocol: protocol.to_string(),
                encoding: name.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Custom => f.write_str("custom"),
        }
    }
}

/// Result of one conversion call.
///
/// Empty batch: both vectors empty. Otherwise exactly one stream and one
/// values entry, the latter `None` when no fields were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutput {
    pub streams: Vec<Bytes>,
    pub values: Vec<Option<FieldValues>>,
}

impl StreamOutput {
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

/// Turns a batch of pipeline events into a byte stream for transport.
///
/// Stateless apart from the shared buffer pool: safe to call from many
/// threads at once, one batch per call.
pub struct Converter {
    protocol: Protocol,
    encoding: Encoding,
    pool: Arc<BufferPool>,
}

impl Converter {
    /// Converter backed by the process-wide [`stream_pool`].
    pub fn new(protocol: &str, encoding: &str) -> Result<Self, ConvertError> {
        let protocol = Protocol::from_str(protocol)?;
        let encoding = Encoding::parse_for(protocol, encoding)?;
        tracing::debug!(%protocol, %encoding, "converter created");
        Ok(Self { protocol, encoding, pool: stream_pool() })
    }

    /// Converter with its own pool sized from `config`.
    pub fn from_config(config: &ConverterConfig) -> Result<Self, ConvertError> {
        let protocol = Protocol::from_str(&config.protocol)?;
        let encoding = Encoding::parse_for(protocol, &config.encoding)?;
        let pool = Arc::new(BufferPool::new(
            config.pool_size,
            config.buffer_capacity,
            config.max_retained_capacity,
        ));
        tracing::debug!(
            %protocol,
            %encoding,
            pool_size = config.pool_size,
            buffer_capacity = config.buffer_capacity,
            "converter created"
        );
        Ok(Self { protocol, encoding, pool })
    }

    /// Swap in a caller-owned pool, e.g. to share one across converters.
    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = pool;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Serialize `group_events` with the configured protocol and resolve
    /// `target_fields` against the group context.
    pub fn to_byte_stream_with_selected_fields(
        &self,
        group_events: &PipelineGroupEvents,
        target_fields: &[String],
    ) -> Result<StreamOutput, ConvertError> {
        match (self.protocol, self.encoding) {
            (Protocol::Raw, Encoding::Custom) => {
                self.convert_to_raw_stream(group_events, target_fields)
            }
        }
    }

    /// Join byte-array events with `\n` into a single stream.
    ///
    /// All or nothing: one non-byte-array event fails the whole batch with
    /// [`ConvertError::UnsupportedEventType`] and no output.
    pub fn convert_to_raw_stream(
        &self,
        group_events: &PipelineGroupEvents,
        target_fields: &[String],
    ) -> Result<StreamOutput, ConvertError> {
        if group_events.events.is_empty() {
            return Ok(StreamOutput::default());
        }

        let mut buf = self.pool.acquire();
        let Some(stream) = write_raw_stream(&group_events.events, &mut buf)? else {
            return Ok(StreamOutput::default());
        };

        let values = find_target_fields_in_group(target_fields, &group_events.group);
        Ok(StreamOutput { streams: vec![stream], values: vec![values] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tributary_models::{GroupInfo, KeyValues, LogEvent, PipelineEvent};

    fn converter() -> Converter {
        Converter::from_config(&ConverterConfig::default()).unwrap()
    }

    fn batch(payloads: &[&'static str]) -> PipelineGroupEvents {
        let metadata: KeyValues = [("foo", "bar")].into_iter().collect();
        let tags: KeyValues = [("env", "prod")].into_iter().collect();
        PipelineGroupEvents::new(
            GroupInfo::new(metadata, tags),
            payloads.iter().map(|p| PipelineEvent::bytes(*p)).collect(),
        )
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_batch_short_circuits() {
        let c = converter();
        let out = c.convert_to_raw_stream(&batch(&[]), &fields(&["tag.env"])).unwrap();
        assert!(out.is_empty());
        assert!(out.values.is_empty());
        // no buffer was taken
        assert_eq!(c.pool().metrics().snapshot().misses, 0);
    }

    #[test]
    fn stream_without_fields() {
        let out = converter().convert_to_raw_stream(&batch(&["a", "b"]), &[]).unwrap();
        assert_eq!(out.streams, vec![Bytes::from_static(b"a\nb")]);
        assert_eq!(out.values, vec![None]);
    }

    #[test]
    fn stream_with_fields() {
        let requested = fields(&["metadata.foo", "tag.env", "tag.none", "host"]);
        let out = converter().convert_to_raw_stream(&batch(&["x"]), &requested).unwrap();
        assert_eq!(out.streams.len(), 1);
        let values = out.values[0].as_ref().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values["metadata.foo"], "bar");
        assert_eq!(values["tag.env"], "prod");
        assert_eq!(values["tag.none"], "");
        assert_eq!(values["host"], "");
    }

    #[test]
    fn failure_returns_buffer_and_no_values() {
        let c = converter();
        let mut group_events = batch(&["a", "b"]);
        group_events.events.push(PipelineEvent::Log(LogEvent::default()));

        let err = c.convert_to_raw_stream(&group_events, &fields(&["tag.env"])).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedEventType(_)));
        assert_eq!(c.pool().available(), 1);
        assert!(c.pool().get().is_empty());
    }

    #[test]
    fn rejected_large_batch_returns_buffer_to_pool() {
        let pool = Arc::new(BufferPool::new(4, 64, 1024));
        let c = converter().with_pool(pool.clone());
        let group_events = PipelineGroupEvents::new(
            GroupInfo::default(),
            vec![
                PipelineEvent::Log(LogEvent::default()),
                PipelineEvent::from(vec![b'x'; 1 << 20]),
            ],
        );

        assert!(c.convert_to_raw_stream(&group_events, &[]).is_err());
        let snap = pool.metrics().snapshot();
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.returns, 1);
        assert_eq!(snap.drops, 0);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn stream_survives_buffer_reuse() {
        let c = converter();
        let first = c.convert_to_raw_stream(&batch(&["first"]), &[]).unwrap();
        let second = c.convert_to_raw_stream(&batch(&["second", "call"]), &[]).unwrap();
        assert_eq!(&first.streams[0][..], b"first");
        assert_eq!(&second.streams[0][..], b"second\ncall");
        assert_eq!(c.pool().metrics().snapshot().hits, 1);
    }

    #[test]
    fn dispatch_raw_custom() {
        let c = Converter::new("raw", "custom").unwrap();
        assert_eq!(c.protocol(), Protocol::Raw);
        assert_eq!(c.encoding(), Encoding::Custom);
        let out = c.to_byte_stream_with_selected_fields(&batch(&["1", "2", "3"]), &[]).unwrap();
        assert_eq!(&out.streams[0][..], b"1\n2\n3");
    }

    #[test]
    fn unsupported_protocol_and_encoding() {
        let err = Converter::new("influxdb", "custom").err().unwrap();
        assert!(matches!(err, ConvertError::UnsupportedProtocol(ref p) if p == "influxdb"));

        let err = Converter::new("raw", "protobuf").err().unwrap();
        assert_eq!(err.to_string(), "unsupported encoding 'protobuf' for protocol 'raw'");

        let cfg = ConverterConfig { encoding: "json".into(), ..Default::default() };
        assert!(Converter::from_config(&cfg).is_err());
    }

    #[test]
    fn with_pool_shares_pool() {
        let pool = Arc::new(BufferPool::new(2, 64, 0));
        let a = converter().with_pool(pool.clone());
        let b = converter().with_pool(pool.clone());
        a.convert_to_raw_stream(&batch(&["a"]), &[]).unwrap();
        b.convert_to_raw_stream(&batch(&["b"]), &[]).unwrap();
        let snap = pool.metrics().snapshot();
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.hits, 1);
    }
}
