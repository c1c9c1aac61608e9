use chrono::NaiveDateTime;
use tracing::trace;

use super::Value;

/// Converts an entity field into a bind parameter.
///
/// `None` fields become [`Value::Null`], which is what sparse updates and
/// generated primary keys look at.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Converts a result cell back into an entity field.
///
/// Returns `None` when the cell cannot represent the target type; the row
/// mapper then falls back to `Default::default()` for that field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! int_conversions {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Integer(*self as i64)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    value.as_i64().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_unsigned_conversions {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                /// Values past `i64::MAX` are bound as decimal text.
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(i) => Value::Integer(i),
                        Err(_) => Value::Text(self.to_string()),
                    }
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Text(s) => s.trim().parse().ok(),
                        other => other.as_i64().and_then(|i| <$ty>::try_from(i).ok()),
                    }
                }
            }
        )*
    };
}

wide_unsigned_conversions!(u64, usize);

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Text(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(ts),
            Value::Text(s) => ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok()),
            _ => None,
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        T::from_value(value).map(Some)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Converts one mapped cell into a field, falling back to the field's
/// default when the cell is missing or does not convert. Used by derived
/// [`Entity::from_values`](crate::metadata::Entity::from_values).
pub fn field_from_cell<T: FromValue + Default>(entity: &str, field: &str, cell: Option<Value>) -> T {
    let Some(value) = cell else {
        trace!(entity, field, "column absent from result, using default");
        return T::default();
    };
    let type_name = value.type_name();
    T::from_value(value).unwrap_or_else(|| {
        trace!(entity, field, from = type_name, "cell does not convert, using default");
        T::default()
    })
}
