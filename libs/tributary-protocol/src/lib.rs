pub mod config;
pub mod converter;
pub mod error;
pub mod fields;
pub mod pool;
pub mod raw;

pub use config::ConverterConfig;
pub use converter::{Converter, Encoding, Protocol, StreamOutput};
pub use error::ConvertError;
pub use fields::{FieldValues, TARGET_GROUP_METADATA_PREFIX, TARGET_GROUP_TAGS_PREFIX};
pub use pool::{BufferPool, PooledBuffer, stream_pool};
