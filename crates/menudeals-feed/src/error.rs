use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The payload is not a key/value object, so no coupon table or store
    /// fields can be located in it. Missing or malformed coupon data inside
    /// an object is never reported this way; it decodes to an empty list.
    #[error("payload is not decodable as key/value data: {reason}")]
    DecodeFault { reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

