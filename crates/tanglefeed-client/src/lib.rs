//! Client side of the tanglefeed protocol.
//!
//! A session is one [`Dispatcher`] reading one connection. Handlers are
//! registered in a [`Registry`] by tag; stores such as [`ManaStore`] register
//! their own handlers and keep bounded, live views for display.
//!
//! ```no_run
//! # async fn run() -> Result<(), tanglefeed_client::ClientError> {
//! use tanglefeed_client::{connect, ClientConfig, Dispatcher, ManaStore, Registry};
//!
//! let config = ClientConfig::default();
//! let store = ManaStore::from_config(&config);
//! let mut registry = Registry::new();
//! store.attach(&mut registry);
//!
//! let mut dispatcher = Dispatcher::new(registry);
//! let reason = dispatcher.run(connect(&config.url).await?).await;
//! println!("closed: {reason:?}, {} points", store.series().len());
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod dispatcher;
mod error;
mod registry;
mod series;
mod store;

pub use config::ClientConfig;
pub use connection::{connect, envelopes, EnvelopeStream};
pub use dispatcher::{
    CloseHandle, CloseReason, Dispatch, DispatchStats, Dispatcher, DispatcherState,
};
pub use error::{ClientError, HandlerError};
pub use registry::{Handler, Registry};
pub use series::{SeriesBuffer, SharedSeries};
pub use store::{ManaEvent, ManaPoint, ManaStore, NetworkScope, PingMonitor};
