pub mod convert;
pub mod error;
pub mod value;

pub use convert::{field_from_cell, FromValue, ToValue};
pub use error::{EzError, Result, SessionError};
pub use value::Value;

pub type Row = Vec<Value>;
