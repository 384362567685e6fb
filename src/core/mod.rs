//! Runtime core: wiring and lifecycle.
//!
//! The public entry point is [`UpdateFeed`], built through [`FeedBuilder`].
//!
//! Internal modules:
//! - [`config`]: feed settings and validation;
//! - [`catalog`]: per-kind message pools with fallback;
//! - [`store`]: rolling newest-first update log;
//! - [`hub`]: single record-then-publish delivery path;
//! - [`source`]: scheduled and manual update synthesis;
//! - [`connection`]: connectivity state machine and its timer driver;
//! - [`feed`]: the owning object and its external contract;
//! - [`builder`]: dependency injection.

mod builder;
mod catalog;
mod config;
mod connection;
mod feed;
mod hub;
mod source;
mod store;

pub use builder::FeedBuilder;
pub use catalog::{MessageCatalog, Template};
pub use config::FeedConfig;
pub use connection::{ConnectionMachine, ConnectionSupervisor, Transition};
pub use feed::UpdateFeed;
pub use source::{MANUAL_TITLE, UpdateSource};
pub use store::UpdateLog;
