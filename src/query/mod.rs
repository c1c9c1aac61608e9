//! Query and mutation descriptors.
//!
//! Descriptors are plain data: they say *what* to read or write and carry no
//! SQL. [`SqlCompiler`](crate::compiler::SqlCompiler) turns them into text.

mod condition;
mod ez_query;
mod mutation;

pub use condition::{column, field, CompareOp, Condition, Logic, Operand};
pub use ez_query::{Direction, EzQuery, OrderItem, Page, QueryDescriptor};
pub use mutation::{Mutation, Target};
