//! Back office of the BigD sales desk.
//!
//! Records are read from a [`DocumentStore`] as loosely shaped JSON
//! documents, decoded once into typed records ([`Snapshot`]) and handed to
//! the pure rollups in [`reports`]. The [`Engine`] ties the two together and
//! owns the write path, including allocation of human-readable codes.

pub use agents::{Agent, AgentPatch, AgentStatus, DEFAULT_SALES_TARGET, GeoPoint, NewAgent};
pub use codes::CodeSequence;
pub use collection::Collection;
pub use customers::{Customer, CustomerPatch, CustomerStatus, NewCustomer};
pub use error::EngineError;
pub use money::Peso;
pub use ops::{AgentWatch, Engine, EngineBuilder};
pub use orders::{NewOrder, Order, OrderItem, OrderPatch, OrderStatus};
pub use products::{Product, Territory};
pub use scope::Scope;
pub use snapshot::{Documents, Record, Snapshot, decode_records};
pub use store::{DocumentStore, MemoryStore, SqlStore, Subscription};

mod agents;
mod codes;
mod collection;
mod customers;
mod decode;
mod error;
pub mod export;
mod money;
mod ops;
mod orders;
mod products;
pub mod reports;
mod scope;
mod snapshot;
pub mod store;

type ResultEngine<T> = Result<T, EngineError>;
