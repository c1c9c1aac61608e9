use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::compiler::{CompiledMutation, SqlCompiler};
use crate::config::EzConfig;
use crate::core::{EzError, Result, Row, Value};
use crate::executor::Executor;
use crate::interface::Session;
use crate::metadata::{Entity, ResolvedEntity, Resolver};
use crate::query::{column, field, Condition, EzQuery, Mutation, Operand, QueryDescriptor, Target};
use crate::result::{map_count, map_rows, map_rows_as_key_value, DcDto};

/// Entry point for every read and write.
///
/// Owns the session and a [`Resolver`] built from the configuration. All
/// methods compile first and only then touch the session, so a statement
/// that fails to compile sends nothing.
///
/// # Examples
///
/// ```no_run
/// # use ezsql::{EzDao, EzConfig, DbType, EzEntity, Session};
/// # use ezsql::query::{EzQuery, Page, field};
/// # #[derive(Debug, Default, EzEntity)]
/// # struct User { #[ez(id, generated)] id: Option<i64>, name: Option<String> }
/// # async fn demo<S: Session>(session: S) -> ezsql::Result<()> {
/// let dao = EzDao::new(session, EzConfig::new(DbType::MySql));
///
/// let page = dao
///     .query_data_and_count(
///         &EzQuery::<User>::new()
///             .filter(field("name").like("A%"))
///             .order_by(field("id").asc())
///             .page(Page::of(1, 20)),
///     )
///     .await?;
/// println!("{} of {}", page.data.len(), page.total);
/// # Ok(())
/// # }
/// ```
pub struct EzDao<S> {
    session: S,
    resolver: Resolver,
}

impl<S: Session> EzDao<S> {
    pub fn new(session: S, config: EzConfig) -> Self {
        Self::with_shared_config(session, Arc::new(config))
    }

    pub fn with_shared_config(session: S, config: Arc<EzConfig>) -> Self {
        Self {
            session,
            resolver: Resolver::new(config),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &EzConfig {
        self.resolver.config()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn compiler(&self) -> SqlCompiler<'_> {
        SqlCompiler::new(&self.resolver)
    }

    fn executor(&self) -> Executor<'_, S> {
        Executor::new(&self.session)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub async fn query<E: Entity>(&self, query: &EzQuery<E>) -> Result<Vec<E>> {
        let entity = self.resolver.resolve::<E>()?;
        self.select(query.descriptor(), &entity).await
    }

    pub async fn query_count<E: Entity>(&self, query: &EzQuery<E>) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        self.count(query.descriptor(), &entity).await
    }

    /// Runs the count first and skips the data query when nothing matches.
    pub async fn query_data_and_count<E: Entity>(&self, query: &EzQuery<E>) -> Result<DcDto<E>> {
        let entity = self.resolver.resolve::<E>()?;
        let descriptor = query.descriptor();
        // Compile both before sending either.
        let count_sql = self.compiler().compile_count(descriptor, &entity)?;
        let select_sql = self.compiler().compile_select(descriptor, &entity)?;

        let total = map_count(&self.executor().query(&count_sql).await?)?;
        if total == 0 {
            return Ok(DcDto::empty());
        }
        let result = self.executor().query(&select_sql).await?;
        Ok(DcDto::new(map_rows(result, &entity), total))
    }

    /// Rows as ordered maps, keyed by result label renamed with
    /// `map_ret_key_pattern`.
    pub async fn query_maps<E: Entity>(
        &self,
        query: &EzQuery<E>,
    ) -> Result<Vec<IndexMap<String, Value>>> {
        let entity = self.resolver.resolve::<E>()?;
        let compiled = self.compiler().compile_select(query.descriptor(), &entity)?;
        let result = self.executor().query(&compiled).await?;
        Ok(map_rows_as_key_value(
            result,
            self.config().map_ret_key_pattern,
        ))
    }

    /// A NULL id matches nothing and returns `None` without a round trip.
    pub async fn get_by_id<E: Entity>(&self, id: impl Into<Value>) -> Result<Option<E>> {
        let id = id.into();
        if id.is_null() {
            return Ok(None);
        }
        let entity = self.resolver.resolve::<E>()?;
        let key = key_operand(&entity);
        let rows = self.select_where(key.eq(id), &entity).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn get_by_ids<E, V>(&self, ids: impl IntoIterator<Item = V>) -> Result<Vec<E>>
    where
        E: Entity,
        V: Into<Value>,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let entity = self.resolver.resolve::<E>()?;
        let key = key_operand(&entity);
        let compiled = ids
            .chunks(self.resolver.dialect().max_params())
            .map(|chunk| {
                let descriptor = QueryDescriptor {
                    condition: key.clone().is_in(chunk.to_vec()),
                    ..QueryDescriptor::default()
                };
                self.compiler().compile_select(&descriptor, &entity)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut found = Vec::new();
        for select in &compiled {
            found.extend(map_rows(self.executor().query(select).await?, &entity));
        }
        Ok(found)
    }

    pub async fn get_by_field<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<E>> {
        let entity = self.resolver.resolve::<E>()?;
        self.select_where(field(name).eq(value), &entity).await
    }

    /// First match in database order; no paging clause is added.
    pub async fn get_one_by_field<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<E>> {
        Ok(self.get_by_field(name, value).await?.into_iter().next())
    }

    pub async fn get_by_column<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<E>> {
        let entity = self.resolver.resolve::<E>()?;
        self.select_where(column(name).eq(value), &entity).await
    }

    pub async fn get_one_by_column<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<E>> {
        Ok(self.get_by_column(name, value).await?.into_iter().next())
    }

    // ---------------------------------------------------------------------
    // Updates
    // ---------------------------------------------------------------------

    /// Sparse update by primary key: only fields holding a value are set.
    pub async fn update<E: Entity>(&self, model: &E) -> Result<u64> {
        self.batch_update(std::slice::from_ref(model)).await
    }

    pub async fn batch_update<E: Entity>(&self, models: &[E]) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        let mutations = models
            .iter()
            .map(|model| {
                let row = model.to_values();
                let target = Target::Key(key_value(&row, &entity));
                Mutation::Update { row, target }
            })
            .collect();
        self.write(mutations, &entity).await
    }

    /// Sparse update of every row whose field `name` equals `value`.
    pub async fn update_by_field<E: Entity>(
        &self,
        model: &E,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        self.update_where(model, field(name).eq(value)).await
    }

    pub async fn update_by_column<E: Entity>(
        &self,
        model: &E,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        self.update_where(model, column(name).eq(value)).await
    }

    /// Sparse update of every row matching `condition`. An empty condition
    /// is refused.
    pub async fn update_where<E: Entity>(&self, model: &E, condition: Condition) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        let mutation = Mutation::Update {
            row: model.to_values(),
            target: Target::Where(condition),
        };
        self.write(vec![mutation], &entity).await
    }

    /// Full-row update by primary key: NULL fields overwrite stored values.
    pub async fn replace<E: Entity>(&self, model: &E) -> Result<u64> {
        self.batch_replace(std::slice::from_ref(model)).await
    }

    pub async fn batch_replace<E: Entity>(&self, models: &[E]) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        let mutations = models
            .iter()
            .map(|model| {
                let row = model.to_values();
                let target = Target::Key(key_value(&row, &entity));
                Mutation::Replace { row, target }
            })
            .collect();
        self.write(mutations, &entity).await
    }

    // ---------------------------------------------------------------------
    // Deletes
    // ---------------------------------------------------------------------

    pub async fn delete_by_id<E: Entity>(&self, id: impl Into<Value>) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        self.write(vec![Mutation::Delete(Target::Key(id.into()))], &entity)
            .await
    }

    pub async fn delete_by_ids<E, V>(&self, ids: impl IntoIterator<Item = V>) -> Result<u64>
    where
        E: Entity,
        V: Into<Value>,
    {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let entity = self.resolver.resolve::<E>()?;
        self.write(vec![Mutation::Delete(Target::Keys(ids))], &entity)
            .await
    }

    pub async fn delete_by_field<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        self.delete_where::<E>(field(name).eq(value)).await
    }

    pub async fn delete_by_column<E: Entity>(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<u64> {
        self.delete_where::<E>(column(name).eq(value)).await
    }

    /// Deletes every row matching `condition`. An empty condition is refused.
    pub async fn delete_where<E: Entity>(&self, condition: Condition) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        self.write(vec![Mutation::Delete(Target::Where(condition))], &entity)
            .await
    }

    /// Deletes the row with `model`'s primary key.
    pub async fn delete<E: Entity>(&self, model: &E) -> Result<u64> {
        let entity = self.resolver.resolve::<E>()?;
        let key = key_value(&model.to_values(), &entity);
        self.write(vec![Mutation::Delete(Target::Key(key))], &entity)
            .await
    }

    /// Deletes the rows with the models' primary keys, one `IN` statement
    /// per parameter-limit's worth of keys. Any model without a key fails the
    /// whole call.
    pub async fn batch_delete<E: Entity>(&self, models: &[E]) -> Result<u64> {
        if models.is_empty() {
            return Ok(0);
        }
        let entity = self.resolver.resolve::<E>()?;
        let keys: Vec<Value> = models
            .iter()
            .map(|model| key_value(&model.to_values(), &entity))
            .collect();
        if keys.iter().any(Value::is_null) {
            return Err(EzError::EmptyConditionOnMutation {
                statement: "DELETE",
                table: entity.table().to_string(),
            });
        }
        self.write(vec![Mutation::Delete(Target::Keys(keys))], &entity)
            .await
    }

    // ---------------------------------------------------------------------
    // Inserts
    // ---------------------------------------------------------------------

    pub async fn save<E: Entity>(&self, model: &E) -> Result<u64> {
        self.batch_save(std::slice::from_ref(model)).await
    }

    /// Inserts every model. Uses multi-row statements when both the dialect
    /// and the session support them, otherwise one statement run once per
    /// model. Models with and without a generated key are inserted by
    /// separate statements.
    pub async fn batch_save<E: Entity>(&self, models: &[E]) -> Result<u64> {
        if models.is_empty() {
            return Ok(0);
        }
        let entity = self.resolver.resolve::<E>()?;
        let rows: Vec<Row> = models.iter().map(E::to_values).collect();
        self.write(vec![Mutation::Insert(rows)], &entity).await
    }

    // ---------------------------------------------------------------------

    async fn select<E: Entity>(
        &self,
        descriptor: &QueryDescriptor,
        entity: &ResolvedEntity,
    ) -> Result<Vec<E>> {
        let compiled = self.compiler().compile_select(descriptor, entity)?;
        let result = self.executor().query(&compiled).await?;
        Ok(map_rows(result, entity))
    }

    async fn select_where<E: Entity>(
        &self,
        condition: Condition,
        entity: &ResolvedEntity,
    ) -> Result<Vec<E>> {
        let descriptor = QueryDescriptor {
            condition,
            ..QueryDescriptor::default()
        };
        self.select(&descriptor, entity).await
    }

    async fn count(&self, descriptor: &QueryDescriptor, entity: &ResolvedEntity) -> Result<u64> {
        let compiled = self.compiler().compile_count(descriptor, entity)?;
        map_count(&self.executor().query(&compiled).await?)
    }

    /// Compiles every mutation, then runs them in order.
    async fn write(&self, mutations: Vec<Mutation>, entity: &ResolvedEntity) -> Result<u64> {
        if mutations.is_empty() {
            return Ok(0);
        }
        let multi_row = self.session.supports_multi_row_insert();
        let compiled = mutations
            .iter()
            .map(|m| self.compiler().compile_mutation(m, entity, multi_row))
            .collect::<Result<Vec<Vec<CompiledMutation>>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        debug!(entity = entity.name(), statements = compiled.len(), "executing mutations");
        self.executor().mutate_all(&compiled).await
    }
}

fn key_operand(entity: &ResolvedEntity) -> Operand {
    Operand::Field(entity.primary_key().field.clone())
}

fn key_value(row: &Row, entity: &ResolvedEntity) -> Value {
    row.get(entity.primary_key_index())
        .cloned()
        .unwrap_or(Value::Null)
}
