use serde::{Deserialize, Serialize};

use crate::core::Value;

/// Left-hand side of a condition, ORDER BY item or projection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Entity field name; resolved through the entity metadata.
    Field(String),
    /// Raw column name; only escaped, never renamed.
    Column(String),
}

pub fn field(name: impl Into<String>) -> Operand {
    Operand::Field(name.into())
}

pub fn column(name: impl Into<String>) -> Operand {
    Operand::Column(name.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl CompareOp {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Boolean filter attached to a query, update or delete.
///
/// # Examples
///
/// ```
/// use ezsql::query::{Condition, field};
///
/// let adults_named_a = Condition::all([
///     field("age").ge(18),
///     field("name").like("A%"),
/// ]);
/// assert!(!adults_named_a.is_empty());
/// assert!(Condition::all([]).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Compare {
        operand: Operand,
        op: CompareOp,
        value: Value,
    },
    In {
        operand: Operand,
        values: Vec<Value>,
    },
    Between {
        operand: Operand,
        low: Value,
        high: Value,
    },
    Null {
        operand: Operand,
        is_null: bool,
    },
    Group {
        logic: Logic,
        children: Vec<Condition>,
    },
}

impl Condition {
    pub fn all(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::Group {
            logic: Logic::And,
            children: children.into_iter().collect(),
        }
    }

    pub fn any(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::Group {
            logic: Logic::Or,
            children: children.into_iter().collect(),
        }
    }

    /// Builds a comparison. Comparing against NULL with `=`/`!=` is turned
    /// into `IS NULL`/`IS NOT NULL` since the former never matches in SQL.
    pub fn compare(operand: Operand, op: CompareOp, value: impl Into<Value>) -> Self {
        let value = value.into();
        match (op, value.is_null()) {
            (CompareOp::Eq, true) => Self::Null {
                operand,
                is_null: true,
            },
            (CompareOp::Ne, true) => Self::Null {
                operand,
                is_null: false,
            },
            _ => Self::Compare { operand, op, value },
        }
    }

    /// A group is empty when none of its descendants is a real predicate.
    /// Empty conditions compile to no WHERE clause at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Group { children, .. } => children.iter().all(Condition::is_empty),
            _ => false,
        }
    }

    /// Combines with `other` under AND, flattening into an existing AND group.
    pub fn and(self, other: Condition) -> Self {
        self.combine(Logic::And, other)
    }

    /// Combines with `other` under OR, flattening into an existing OR group.
    pub fn or(self, other: Condition) -> Self {
        self.combine(Logic::Or, other)
    }

    fn combine(self, logic: Logic, other: Condition) -> Self {
        match self {
            Self::Group {
                logic: current,
                mut children,
            } if current == logic || children.is_empty() => {
                children.push(other);
                Self::Group { logic, children }
            }
            this => Self::Group {
                logic,
                children: vec![this, other],
            },
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::all([])
    }
}

impl Operand {
    pub fn eq(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Ne, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Gt, value)
    }

    pub fn ge(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Ge, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Lt, value)
    }

    pub fn le(self, value: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Le, value)
    }

    pub fn like(self, pattern: impl Into<Value>) -> Condition {
        Condition::compare(self, CompareOp::Like, pattern)
    }

    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Condition {
        Condition::In {
            operand: self,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Condition {
        Condition::Between {
            operand: self,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn is_null(self) -> Condition {
        Condition::Null {
            operand: self,
            is_null: true,
        }
    }

    pub fn is_not_null(self) -> Condition {
        Condition::Null {
            operand: self,
            is_null: false,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Column(name) => name,
        }
    }
}
