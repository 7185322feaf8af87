//! WebSocket transport adapter.
//!
//! Turns a node's dashboard WebSocket into a stream of [`Envelope`]s for the
//! [`Dispatcher`](crate::Dispatcher). Reconnecting is up to the caller.

use crate::ClientError;
use futures_util::{future, Stream, StreamExt};
use std::pin::Pin;
use tanglefeed_core::Envelope;
use tokio_tungstenite::tungstenite::{self, Message};

/// A boxed envelope stream, as returned by [`connect`].
pub type EnvelopeStream = Pin<Box<dyn Stream<Item = Result<Envelope, ClientError>> + Send>>;

/// Open the feed at `url`.
pub async fn connect(url: &str) -> Result<EnvelopeStream, ClientError> {
    let (ws, response) = tokio_tungstenite::connect_async(url).await?;
    tracing::debug!(url, status = %response.status(), "connected");
    Ok(Box::pin(envelopes(ws)))
}

/// Map WebSocket messages to envelopes.
///
/// Text and binary frames are parsed as envelopes, control frames are
/// skipped, and a close frame ends the stream.
pub fn envelopes<S>(messages: S) -> impl Stream<Item = Result<Envelope, ClientError>>
where
    S: Stream<Item = Result<Message, tungstenite::Error>>,
{
    messages
        .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
        .filter_map(|msg| future::ready(to_envelope(msg)))
}

fn to_envelope(
    msg: Result<Message, tungstenite::Error>,
) -> Option<Result<Envelope, ClientError>> {
    match msg {
        Ok(Message::Text(text)) => {
            Some(Envelope::from_frame(text.as_bytes()).map_err(Into::into))
        }
        Ok(Message::Binary(data)) => Some(Envelope::from_frame(&data).map_err(Into::into)),
        Ok(_) => None,
        Err(e) => Some(Err(e.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CloseReason, ManaStore, Registry};
    use crate::{Dispatcher, DispatcherState};
    use futures_util::stream;
    use tanglefeed_core::Tag;

    async fn collect(
        messages: Vec<Result<Message, tungstenite::Error>>,
    ) -> Vec<Result<Envelope, ClientError>> {
        envelopes(stream::iter(messages)).collect().await
    }

    #[tokio::test]
    async fn text_and_binary_frames() {
        let out = collect(vec![
            Ok(Message::text(r#"{"type":8,"data":1}"#)),
            Ok(Message::binary(br#"{"type":9,"data":2}"#.to_vec())),
        ])
        .await;

        let tags: Vec<Tag> = out.into_iter().map(|r| r.unwrap().tag).collect();
        assert_eq!(tags, vec![Tag(8), Tag(9)]);
    }

    #[tokio::test]
    async fn control_frames_skipped_and_close_ends() {
        let out = collect(vec![
            Ok(Message::Ping(Default::default())),
            Ok(Message::text(r#"{"type":0}"#)),
            Ok(Message::Pong(Default::default())),
            Ok(Message::Close(None)),
            Ok(Message::text(r#"{"type":8,"data":1}"#)),
        ])
        .await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().tag, Tag(0));
    }

    #[tokio::test]
    async fn malformed_frame_is_not_fatal() {
        let out = collect(vec![
            Ok(Message::text("{oops")),
            Err(tungstenite::Error::ConnectionClosed),
        ])
        .await;

        assert!(!out[0].as_ref().unwrap_err().is_fatal());
        assert!(out[1].as_ref().unwrap_err().is_fatal());
    }

    #[tokio::test]
    async fn feed_into_store() {
        let store = ManaStore::new(3, 3);
        let mut registry = Registry::new();
        store.attach(&mut registry);
        let mut dispatcher = Dispatcher::new(registry);

        let messages: Vec<Result<Message, tungstenite::Error>> = (1..=4)
            .map(|t| {
                Ok(Message::text(format!(
                    r#"{{"type":8,"data":{{"nodeID":"n1","access":{t},"consensus":0,"time":{t}}}}}"#
                )))
            })
            .chain([
                Ok(Message::text("not json")),
                Ok(Message::text(r#"{"type":6,"data":{}}"#)),
            ])
            .collect();
        let reason = dispatcher.run(envelopes(stream::iter(messages))).await;

        assert!(matches!(reason, CloseReason::EndOfStream));
        assert_eq!(dispatcher.state(), DispatcherState::Closed);
        let access: Vec<f64> = store.series().iter().map(|p| p.access).collect();
        assert_eq!(access, vec![2.0, 3.0, 4.0]);
        let stats = dispatcher.stats();
        assert_eq!((stats.delivered, stats.malformed, stats.unroutable), (4, 1, 1));
    }
}
