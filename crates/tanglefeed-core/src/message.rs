//! The message envelope.
//!
//! Every frame on the feed is a JSON object `{"type": <tag>, "data": <payload>}`.
//! The envelope keeps the payload as raw bytes; only the handler registered
//! for the tag knows its shape.

use crate::Tag;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// One decoded unit from the connection: a tag and its undecoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub tag: Tag,
    pub payload: Vec<u8>,
}

#[derive(Deserialize)]
struct WireFrame {
    #[serde(rename = "type")]
    tag: Tag,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn new(tag: impl Into<Tag>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag: tag.into(),
            payload: payload.into(),
        }
    }

    /// Build an envelope by serializing `data` as the payload.
    pub fn encode<T: Serialize>(tag: impl Into<Tag>, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(tag, serde_json::to_vec(data)?))
    }

    /// Split a wire frame into tag and raw payload.
    ///
    /// A missing or `null` `data` field yields the payload `null`.
    pub fn from_frame(frame: &[u8]) -> Result<Self, FrameError> {
        let wire: WireFrame = serde_json::from_slice(frame).map_err(FrameError::Malformed)?;
        let payload = match wire.data {
            Some(raw) => raw.get().as_bytes().to_vec(),
            None => b"null".to_vec(),
        };
        Ok(Self {
            tag: wire.tag,
            payload,
        })
    }

    /// Decode the payload into the shape expected for this tag.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    /// Payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Error splitting a wire frame into an envelope.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MsgType;

    #[test]
    fn frame_keeps_payload_raw() {
        let env = Envelope::from_frame(br#"{"type":8,"data":{"access":1.5}}"#).unwrap();
        assert_eq!(env.tag, MsgType::Mana.tag());
        assert_eq!(env.payload, br#"{"access":1.5}"#.to_vec());
    }

    #[test]
    fn missing_data_is_null() {
        let env = Envelope::from_frame(br#"{"type":0}"#).unwrap();
        assert_eq!(env.tag, Tag(0));
        assert_eq!(env.payload, b"null".to_vec());
    }

    #[test]
    fn unknown_tags_still_decode() {
        let env = Envelope::from_frame(br#"{"type":99,"data":[1,2]}"#).unwrap();
        assert_eq!(env.tag, Tag(99));
        assert_eq!(env.payload_len(), 5);
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert!(Envelope::from_frame(b"not json").is_err());
        assert!(Envelope::from_frame(br#"{"data":{}}"#).is_err());
        assert!(Envelope::from_frame(br#"{"type":-1}"#).is_err());
    }

    #[test]
    fn encode_then_decode_payload() {
        let env = Envelope::encode(MsgType::ManaDashboardAddress, &"http://node:8081").unwrap();
        let url: String = env.decode().unwrap();
        assert_eq!(url, "http://node:8081");
    }
}
