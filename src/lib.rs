// ============================================================================
// ezsql
// ============================================================================
//
// Entity query and mutation descriptors compiled into dialect-correct SQL,
// executed through a caller-supplied session.

extern crate self as ezsql;

pub mod compiler;
pub mod config;
pub mod core;
pub mod dialect;
pub mod executor;
pub mod facade;
pub mod interface;
pub mod metadata;
pub mod prelude;
pub mod query;
pub mod result;

// Re-export main types for convenience
pub use config::{DbType, EzConfig, NamingPattern};
pub use crate::core::{EzError, FromValue, Result, Row, SessionError, ToValue, Value, field_from_cell};
pub use facade::{EzDao, EzService};
pub use interface::Session;
pub use metadata::{Entity, EntityMeta, FieldMeta};
pub use result::{DcDto, QueryResult};

pub use ezsql_derive::EzEntity;
