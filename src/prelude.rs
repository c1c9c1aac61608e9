//! Everything application code usually needs, in one import.
//!
//! ```
//! use ezsql::prelude::*;
//!
//! let filter = field("age").ge(18).and(column("deleted").eq(false));
//! assert!(!filter.is_empty());
//! ```

pub use crate::query::{Condition, EzQuery, Page, column, field};
pub use crate::{
    DbType, DcDto, Entity, EzConfig, EzDao, EzEntity, EzError, EzService, NamingPattern, Result,
    Session, Value,
};
