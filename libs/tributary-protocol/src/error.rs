use tributary_models::EventType;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The batch holds an event this protocol cannot serialize.
    /// The whole batch is rejected; nothing is emitted.
    #[error("unsupported event type {0}")]
    UnsupportedEventType(EventType),

    #[error("unsupported protocol '{0}'")]
    UnsupportedProtocol(String),

    #[error("unsupported encoding '{encoding}' for protocol '{protocol}'")]
    UnsupportedEncoding { protocol: String, encoding: String },
}
