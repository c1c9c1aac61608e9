use async_trait::async_trait;
use indexmap::IndexMap;

use super::EzDao;
use crate::core::{Result, Value};
use crate::interface::Session;
use crate::metadata::Entity;
use crate::query::{Condition, EzQuery};
use crate::result::DcDto;

/// Per-entity view of [`EzDao`].
///
/// Implementors only provide [`dao`](EzService::dao); every operation has
/// a default that delegates to it.
///
/// ```no_run
/// # use ezsql::{EzDao, EzEntity, EzService, Session};
/// # #[derive(Debug, Default, EzEntity)]
/// # struct User { #[ez(id)] id: Option<i64>, name: Option<String> }
/// struct UserService<S> {
///     dao: EzDao<S>,
/// }
///
/// impl<S: Session> EzService<User> for UserService<S> {
///     type Session = S;
///
///     fn dao(&self) -> &EzDao<S> {
///         &self.dao
///     }
/// }
/// ```
#[async_trait]
pub trait EzService<E: Entity>: Send + Sync {
    type Session: Session;

    fn dao(&self) -> &EzDao<Self::Session>;

    async fn query(&self, query: &EzQuery<E>) -> Result<Vec<E>> {
        self.dao().query(query).await
    }

    async fn query_count(&self, query: &EzQuery<E>) -> Result<u64> {
        self.dao().query_count(query).await
    }

    async fn query_data_and_count(&self, query: &EzQuery<E>) -> Result<DcDto<E>> {
        self.dao().query_data_and_count(query).await
    }

    async fn query_maps(&self, query: &EzQuery<E>) -> Result<Vec<IndexMap<String, Value>>> {
        self.dao().query_maps(query).await
    }

    async fn get_by_id(&self, id: Value) -> Result<Option<E>> {
        self.dao().get_by_id::<E>(id).await
    }

    async fn get_by_ids(&self, ids: Vec<Value>) -> Result<Vec<E>> {
        self.dao().get_by_ids::<E, Value>(ids).await
    }

    async fn get_by_field(&self, field: &str, value: Value) -> Result<Vec<E>> {
        self.dao().get_by_field::<E>(field, value).await
    }

    async fn get_one_by_field(&self, field: &str, value: Value) -> Result<Option<E>> {
        self.dao().get_one_by_field::<E>(field, value).await
    }

    async fn get_by_column(&self, column: &str, value: Value) -> Result<Vec<E>> {
        self.dao().get_by_column::<E>(column, value).await
    }

    async fn get_one_by_column(&self, column: &str, value: Value) -> Result<Option<E>> {
        self.dao().get_one_by_column::<E>(column, value).await
    }

    async fn update(&self, model: &E) -> Result<u64> {
        self.dao().update(model).await
    }

    async fn batch_update(&self, models: &[E]) -> Result<u64> {
        self.dao().batch_update(models).await
    }

    async fn update_by_field(&self, model: &E, field: &str, value: Value) -> Result<u64> {
        self.dao().update_by_field(model, field, value).await
    }

    async fn update_by_column(&self, model: &E, column: &str, value: Value) -> Result<u64> {
        self.dao().update_by_column(model, column, value).await
    }

    async fn update_where(&self, model: &E, condition: Condition) -> Result<u64> {
        self.dao().update_where(model, condition).await
    }

    async fn replace(&self, model: &E) -> Result<u64> {
        self.dao().replace(model).await
    }

    async fn batch_replace(&self, models: &[E]) -> Result<u64> {
        self.dao().batch_replace(models).await
    }

    async fn delete_by_id(&self, id: Value) -> Result<u64> {
        self.dao().delete_by_id::<E>(id).await
    }

    async fn delete_by_ids(&self, ids: Vec<Value>) -> Result<u64> {
        self.dao().delete_by_ids::<E, Value>(ids).await
    }

    async fn delete_by_field(&self, field: &str, value: Value) -> Result<u64> {
        self.dao().delete_by_field::<E>(field, value).await
    }

    async fn delete_by_column(&self, column: &str, value: Value) -> Result<u64> {
        self.dao().delete_by_column::<E>(column, value).await
    }

    async fn delete_where(&self, condition: Condition) -> Result<u64> {
        self.dao().delete_where::<E>(condition).await
    }

    async fn delete(&self, model: &E) -> Result<u64> {
        self.dao().delete(model).await
    }

    async fn batch_delete(&self, models: &[E]) -> Result<u64> {
        self.dao().batch_delete(models).await
    }

    async fn save(&self, model: &E) -> Result<u64> {
        self.dao().save(model).await
    }

    async fn batch_save(&self, models: &[E]) -> Result<u64> {
        self.dao().batch_save(models).await
    }
}
