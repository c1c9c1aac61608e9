use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::condition::{Condition, Operand};
use crate::metadata::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub operand: Operand,
    #[serde(default)]
    pub direction: Direction,
}

impl Operand {
    pub fn asc(self) -> OrderItem {
        OrderItem {
            operand: self,
            direction: Direction::Asc,
        }
    }

    pub fn desc(self) -> OrderItem {
        OrderItem {
            operand: self,
            direction: Direction::Desc,
        }
    }
}

/// Row window applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// One-based page number, as UI paginators count.
    pub fn of(page_no: u64, page_size: u64) -> Self {
        Self {
            offset: page_no.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }
}

/// Untyped, serializable part of a query. [`EzQuery`] wraps it with the
/// target entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub condition: Condition,
    pub order_by: Vec<OrderItem>,
    /// Empty means every mapped column, in field declaration order.
    pub projection: Vec<Operand>,
    pub page: Option<Page>,
}

impl QueryDescriptor {
    pub fn has_order_by(&self) -> bool {
        !self.order_by.is_empty()
    }
}

/// Query against entity `E`.
///
/// # Examples
///
/// ```
/// use ezsql::query::{EzQuery, Page, field};
/// # #[derive(Default, ezsql::EzEntity)]
/// # struct User { #[ez(id)] id: i64, name: Option<String> }
///
/// let query = EzQuery::<User>::new()
///     .filter(field("name").like("A%"))
///     .order_by(field("id").desc())
///     .page(Page::of(2, 20));
///
/// assert_eq!(query.descriptor().page, Some(Page::new(20, 20)));
/// ```
pub struct EzQuery<E> {
    descriptor: QueryDescriptor,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EzQuery<E> {
    pub fn new() -> Self {
        Self::from_descriptor(QueryDescriptor::default())
    }

    pub fn from_descriptor(descriptor: QueryDescriptor) -> Self {
        Self {
            descriptor,
            _entity: PhantomData,
        }
    }

    /// ANDs `condition` into the query's filter.
    pub fn filter(mut self, condition: Condition) -> Self {
        let current = std::mem::take(&mut self.descriptor.condition);
        self.descriptor.condition = current.and(condition);
        self
    }

    pub fn order_by(mut self, item: OrderItem) -> Self {
        self.descriptor.order_by.push(item);
        self
    }

    pub fn select(mut self, operands: impl IntoIterator<Item = Operand>) -> Self {
        self.descriptor.projection.extend(operands);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.descriptor.page = Some(page);
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        self.page(Page::new(0, limit))
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    pub fn into_descriptor(self) -> QueryDescriptor {
        self.descriptor
    }
}

impl<E: Entity> Default for EzQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EzQuery<E> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EzQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EzQuery")
            .field("entity", &std::any::type_name::<E>())
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
