use crate::{
    Driver, Error, Executor, FieldKind, FieldValue, Params, Query, Record, Registry, Result,
    RowsAffected, Schema, SqlWriter, Value, materialize, stream::StreamExt, truncate_long,
};
use std::{pin::pin, sync::Arc};
use time::OffsetDateTime;

/// Entry point of the library: an executor together with the schemas of the
/// record types used through it.
///
/// The registry can be shared with other `Database` values, records
/// registered through one are then known to all of them.
pub struct Database<E: Executor> {
    executor: E,
    registry: Arc<Registry>,
    last_query: String,
}

impl<E: Executor> Database<E> {
    pub fn new(executor: E) -> Self {
        Self::with_registry(executor, Default::default())
    }

    pub fn with_registry(executor: E, registry: Arc<Registry>) -> Self {
        Self {
            executor,
            registry,
            last_query: String::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn executor(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Text of the most recent statement, set before it is executed.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Builds and caches the schema of `R`. Records referenced through a
    /// `foreign` column must be registered before the records referencing them.
    pub fn register<R: Record>(&self) -> Result<Arc<Schema>> {
        self.registry.schema_of::<R>()
    }

    /// Binds `record` to its schema, registering `R` if needed.
    pub fn attach<'a, R: Record>(&'a mut self, record: &'a mut R) -> Result<Bound<'a, E, R>> {
        let schema = self.register::<R>()?;
        Ok(Bound {
            database: self,
            record,
            schema,
        })
    }

    /// Selects the rows matching `params` and appends them to `out`.
    ///
    /// Returns the number of rows appended. When a row cannot be read the
    /// error is returned and the rows read before it stay in `out`.
    pub async fn get_many<R: Record + Default>(
        &mut self,
        params: &Params,
        out: &mut Vec<R>,
    ) -> Result<usize> {
        let schema = self.register::<R>()?;
        schema.validate()?;
        let mut sql = String::new();
        let args = self
            .executor
            .driver()
            .sql_writer()
            .write_select(&mut sql, &schema, params)?;
        let query = self.track(sql, args);
        let mut stream = pin!(self.executor.fetch(query));
        let mut count = 0;
        while let Some(row) = stream.next().await {
            let row = row.map_err(|e| failure(&self.last_query, e))?;
            let mut record = R::default();
            if let Err(e) = materialize(&schema, &row.values, &mut record) {
                log::warn!(
                    "Stopped reading `{}` after {} rows: {}",
                    schema.table,
                    count,
                    e
                );
                return Err(e);
            }
            out.push(record);
            count += 1;
        }
        Ok(count)
    }

    fn track(&mut self, sql: String, params: Vec<Value>) -> Query {
        self.last_query.clone_from(&sql);
        let query = Query::new(sql, params);
        log::debug!("{}", query);
        query
    }

    async fn execute(&mut self, sql: String, params: Vec<Value>) -> Result<RowsAffected> {
        let query = self.track(sql, params);
        let result = self.executor.execute(query).await;
        result.map_err(|e| failure(&self.last_query, e))
    }

    async fn fetch_one<R: Record>(
        &mut self,
        sql: String,
        params: Vec<Value>,
        schema: &Schema,
        record: &mut R,
    ) -> Result<usize> {
        let query = self.track(sql, params);
        let row = {
            let mut stream = pin!(self.executor.fetch(query));
            stream.next().await
        };
        match row {
            Some(Ok(row)) => materialize(schema, &row.values, record),
            Some(Err(e)) => Err(failure(&self.last_query, e)),
            None => Err(Error::NoMatchingRow {
                table: schema.table.clone(),
                query: self.last_query.clone(),
            }),
        }
    }

    fn writer(&self) -> <E::Driver as Driver>::SqlWriter {
        self.executor.driver().sql_writer()
    }
}

fn failure(query: &str, error: anyhow::Error) -> Error {
    let error = Error::execution(truncate_long!(query).to_string(), error);
    log::error!("{:#}", error);
    error
}

/// A record attached to a [`Database`].
///
/// Every operation first validates the schema of `R`, then runs exactly one
/// statement. Timestamps and generated keys are written into the record only
/// after the statement succeeded.
pub struct Bound<'a, E: Executor, R: Record> {
    database: &'a mut Database<E>,
    record: &'a mut R,
    schema: Arc<Schema>,
}

impl<'a, E: Executor, R: Record> Bound<'a, E, R> {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn record(&self) -> &R {
        &*self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut *self.record
    }

    pub fn last_query(&self) -> &str {
        self.database.last_query()
    }

    pub async fn create_table(&mut self) -> Result<()> {
        self.schema.validate()?;
        let mut sql = String::new();
        self.database
            .writer()
            .write_create_table(&mut sql, &self.schema);
        self.database.execute(sql, Vec::new()).await?;
        Ok(())
    }

    /// Reads the first row matching `params` into the record.
    pub async fn get_existing(&mut self, params: &Params) -> Result<usize> {
        self.schema.validate()?;
        let params = Params {
            limit: Some(1),
            ..params.clone()
        };
        let mut sql = String::new();
        let args = self
            .database
            .writer()
            .write_select(&mut sql, &self.schema, &params)?;
        self.database
            .fetch_one(sql, args, &self.schema, self.record)
            .await
    }

    /// Inserts the record. When a row was inserted the created and updated
    /// columns are set to the insertion time, and an integer key left out of
    /// the statement takes the generated value.
    pub async fn save_new(&mut self, params: &Params) -> Result<u64> {
        self.schema.validate()?;
        let now = OffsetDateTime::now_utc();
        let mut sql = String::new();
        let args = self.database.writer().write_insert(
            &mut sql,
            &self.schema,
            &*self.record,
            params,
            now,
        )?;
        let primary_key = self.schema.primary_key()?;
        let generated = primary_key.kind == FieldKind::Integer
            && (primary_key.auto_increment
                || self
                    .record
                    .read(&primary_key.path)
                    .map_err(|e| e.for_column(&primary_key.name))?
                    .is_zero());
        let affected = self.database.execute(sql, args).await?;
        if affected.rows_affected == 0 {
            return Ok(0);
        }
        for column in self.schema.columns.iter().filter(|v| v.stamped()) {
            self.record.write(&column.path, FieldValue::Time(now))?;
        }
        if let (true, Some(id)) = (generated, affected.last_affected_id) {
            self.record
                .write(&primary_key.path, FieldValue::Integer(id))
                .map_err(|e| e.for_column(&primary_key.name))?;
        }
        Ok(affected.rows_affected)
    }

    /// Updates the row having the primary key of the record.
    pub async fn save_existing(&mut self, params: &Params) -> Result<u64> {
        self.schema.validate()?;
        let now = OffsetDateTime::now_utc();
        let mut sql = String::new();
        let args = self.database.writer().write_update(
            &mut sql,
            &self.schema,
            &*self.record,
            params,
            now,
        )?;
        let affected = self.database.execute(sql, args).await?;
        if let Some(column) = self.schema.updated.and_then(|i| self.schema.columns.get(i)) {
            self.record.write(&column.path, FieldValue::Time(now))?;
        }
        Ok(affected.rows_affected)
    }

    /// Reloads the record from the row having its primary key, following the
    /// `refresh:` ordering when several rows match.
    pub async fn refresh(&mut self) -> Result<usize> {
        self.schema.validate()?;
        let writer = self.database.writer();
        let primary_key = self.schema.primary_key()?;
        let key = self
            .record
            .read(&primary_key.path)
            .map_err(|e| e.for_column(&primary_key.name))?;
        let mut filter = String::new();
        writer.write_identifier(&mut filter, &primary_key.name);
        filter.push_str(" = ");
        writer.write_placeholder(&mut filter, 0);
        let params = Params {
            filter: Some(filter),
            filter_args: vec![writer.write_field_value(primary_key, key)?],
            order_by: self.schema.refresh.clone(),
            limit: Some(1),
            ..Default::default()
        };
        let mut sql = String::new();
        let args = writer.write_select(&mut sql, &self.schema, &params)?;
        self.database
            .fetch_one(sql, args, &self.schema, self.record)
            .await
    }

    /// Deletes the row having the primary key of the record.
    pub async fn delete(&mut self) -> Result<u64> {
        self.schema.validate()?;
        let mut sql = String::new();
        let args = self
            .database
            .writer()
            .write_delete(&mut sql, &self.schema, &*self.record)?;
        Ok(self.database.execute(sql, args).await?.rows_affected)
    }
}
