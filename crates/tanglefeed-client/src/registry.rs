//! Handler registry.
//!
//! Maps a [`Tag`] to the one handler interested in it. The map is keyed by
//! the raw tag, so reserved and unknown tags need no special casing: they
//! just have no entry.

use crate::HandlerError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use tanglefeed_core::Tag;

/// A handler receives the raw payload of every envelope with its tag.
pub type Handler = Box<dyn FnMut(&[u8]) -> Result<(), HandlerError> + Send>;

/// The dispatch table for one session.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<Tag, Handler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler for `tag`.
    ///
    /// Replaces any handler already registered for the tag. Returns `true`
    /// if one was replaced.
    pub fn register<F>(&mut self, tag: impl Into<Tag>, handler: F) -> bool
    where
        F: FnMut(&[u8]) -> Result<(), HandlerError> + Send + 'static,
    {
        let tag = tag.into();
        let replaced = self.handlers.insert(tag, Box::new(handler)).is_some();
        if replaced {
            tracing::debug!(%tag, "replaced handler");
        }
        replaced
    }

    /// Register a handler that receives the payload decoded as `T`.
    ///
    /// Payloads that do not decode as `T` never reach `handler`; the
    /// dispatcher sees the decode error instead.
    pub fn on<T, F>(&mut self, tag: impl Into<Tag>, mut handler: F) -> bool
    where
        T: DeserializeOwned,
        F: FnMut(T) + Send + 'static,
    {
        self.register(tag, move |payload: &[u8]| {
            let value = serde_json::from_slice(payload)?;
            handler(value);
            Ok(())
        })
    }

    /// Remove the handler for `tag`. Returns `true` if there was one.
    pub fn unregister(&mut self, tag: impl Into<Tag>) -> bool {
        self.handlers.remove(&tag.into()).is_some()
    }

    /// The handler for `tag`, if any.
    pub fn lookup(&mut self, tag: Tag) -> Option<&mut Handler> {
        self.handlers.get_mut(&tag)
    }

    pub fn contains(&self, tag: impl Into<Tag>) -> bool {
        self.handlers.contains_key(&tag.into())
    }

    /// Registered tags, in ascending order.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.handlers.keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tanglefeed_core::MsgType;

    #[test]
    fn lookup_unregistered_is_none() {
        let mut registry = Registry::new();
        assert!(registry.lookup(Tag(8)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();

        let first = seen.clone();
        assert!(!registry.register(MsgType::Mana, move |_: &[u8]| {
            first.lock().unwrap().push("h1");
            Ok(())
        }));
        let second = seen.clone();
        assert!(registry.register(Tag(8), move |_: &[u8]| {
            second.lock().unwrap().push("h2");
            Ok(())
        }));

        assert_eq!(registry.len(), 1);
        let handler = registry.lookup(Tag(8)).unwrap();
        handler(b"null".as_slice()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["h2"]);
    }

    #[test]
    fn typed_handler_decodes_payload() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let mut registry = Registry::new();
        registry.on(MsgType::ManaDashboardAddress, move |url: String| {
            *sink.lock().unwrap() = Some(url);
        });

        let handler = registry.lookup(MsgType::ManaDashboardAddress.tag()).unwrap();
        handler(br#""http://node:8081""#.as_slice()).unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("http://node:8081"));
    }

    #[test]
    fn typed_handler_reports_decode_errors() {
        let mut registry = Registry::new();
        registry.on(Tag(14), |_: String| panic!("must not be called"));

        let handler = registry.lookup(Tag(14)).unwrap();
        assert!(matches!(handler(b"{}".as_slice()), Err(HandlerError::Decode(_))));
    }

    #[test]
    fn unregister_and_tags() {
        let mut registry = Registry::new();
        registry.register(Tag(12), |_: &[u8]| Ok(()));
        registry.register(Tag(8), |_: &[u8]| Ok(()));
        assert_eq!(registry.tags(), vec![Tag(8), Tag(12)]);

        assert!(registry.unregister(Tag(8)));
        assert!(!registry.unregister(Tag(8)));
        assert!(!registry.contains(Tag(8)));
        assert!(registry.contains(MsgType::ManaPledge));
    }
}
