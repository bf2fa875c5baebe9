//! Authenticated Resource ledger module.
//!
//! Manages a single entity type, [`resource::Resource`], inside an ordered
//! key-value store:
//!
//! * [`sequence`] — persisted counter issuing unique, increasing ids.
//! * [`resource`] — id-keyed record storage with ordered, paginated listing.
//! * [`service`] — Create/Update/Delete handlers enforcing category
//!   validation and creator-only mutation.
//! * [`query`] — public read access.
//! * [`genesis`] — import/export of module state.
//! * [`app`] — a single-process host running each message as one atomic
//!   transaction over a persisted [`store::MemStore`].
//!
//! Handlers never own storage. They receive the open transaction as
//! `&mut impl KvStore` and either finish every write or return an error before
//! the first one.

pub mod app;
pub mod config;
pub mod error;
pub mod genesis;
pub mod keys;
pub mod query;
pub mod resource;
pub mod sequence;
pub mod service;
pub mod store;

pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use resource::{Creator, Resource, ResourceId};
pub use store::KvStore;
