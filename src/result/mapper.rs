//! Rows to entities, key/value maps and counts.

use indexmap::IndexMap;
use tracing::trace;

use super::QueryResult;
use crate::config::NamingPattern;
use crate::core::{EzError, Result, Value};
use crate::metadata::{Entity, ResolvedEntity};

/// Maps every row onto `E`.
///
/// Result labels are matched against the resolved column names and the
/// logical field names, ignoring case. Unknown labels (such as a paging
/// row-number column) are skipped; fields with no matching label are left
/// for [`Entity::from_values`] to default.
pub fn map_rows<E: Entity>(result: QueryResult, entity: &ResolvedEntity) -> Vec<E> {
    let width = entity.columns().len();
    let positions: Vec<Option<usize>> = result
        .columns
        .iter()
        .map(|label| {
            let position = entity.position_of_column(label);
            if position.is_none() {
                trace!(entity = entity.name(), label = %label, "ignoring unmapped result column");
            }
            position
        })
        .collect();

    result
        .rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<Option<Value>> = vec![None; width];
            for (value, position) in row.into_iter().zip(&positions) {
                if let Some(idx) = position {
                    cells[*idx] = Some(value);
                }
            }
            E::from_values(cells)
        })
        .collect()
}

/// Maps every row into an ordered map keyed by result label, with keys
/// renamed by `pattern`.
pub fn map_rows_as_key_value(
    result: QueryResult,
    pattern: NamingPattern,
) -> Vec<IndexMap<String, Value>> {
    let keys: Vec<String> = result.columns.iter().map(|c| pattern.apply(c)).collect();
    result
        .rows
        .into_iter()
        .map(|row| keys.iter().cloned().zip(row).collect())
        .collect()
}

/// Reads the single integer cell a `COUNT(*)` query returns.
pub fn map_count(result: &QueryResult) -> Result<u64> {
    let cell = result
        .scalar()
        .ok_or_else(|| EzError::MappingMismatch("count query returned no rows".into()))?;
    cell.as_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| {
            EzError::MappingMismatch(format!(
                "count query returned {} {} instead of a non-negative integer",
                cell.type_name(),
                cell
            ))
        })
}
