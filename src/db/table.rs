//! Typed per-entity repository handles.
//!
//! Every entity declares its table layout once through [`Entity`]; [`Table`]
//! provides the shared CRUD operations on top of it.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::query_builder::Separated;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::models::timestamp;

/// Bind target for one row of column values, in [`Entity::COLUMNS`] order.
pub type RowValues<'qb> = Separated<'qb, 'static, Sqlite, &'static str>;

/// Equality predicates pushed into a list query.
pub trait Filter {
    /// Append ` AND ...` conditions to a query that already has a `WHERE` clause.
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>);
}

impl Filter for () {
    fn push_conditions(&self, _query: &mut QueryBuilder<'static, Sqlite>) {}
}

/// A record stored in its own table, keyed by a text `id` column.
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    /// Column names, `id` first; [`Entity::bind_values`] binds in this order.
    const COLUMNS: &'static [&'static str];
    /// Ordering clause for list queries.
    const ORDER_BY: &'static str;

    type Filter: Filter + Default + Send + Sync;
    type Patch: Send + Sync;

    fn id(&self) -> &str;
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
    fn bind_values(&self, row: &mut RowValues<'_>);
    fn apply_patch(&mut self, patch: &Self::Patch) -> Result<(), AppError>;
    /// Record a modification time.
    fn touch(&mut self, now: String);
}

/// Repository handle for one entity type.
pub struct Table<'a, E> {
    pub(super) pool: &'a SqlitePool,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Table<'a, E> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn column_list() -> String {
        E::COLUMNS.join(", ")
    }

    fn select(filter: &E::Filter, counted: bool) -> QueryBuilder<'static, Sqlite> {
        let count = if counted {
            ", COUNT(*) OVER () AS total_count"
        } else {
            ""
        };
        let mut query = QueryBuilder::new(format!(
            "SELECT {}{} FROM {} WHERE 1 = 1",
            Self::column_list(),
            count,
            E::TABLE
        ));
        filter.push_conditions(&mut query);
        query.push(" ORDER BY ").push(E::ORDER_BY);
        query
    }

    /// Find a record by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            Self::column_list(),
            E::TABLE
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(E::from_row).transpose()?)
    }

    /// Find a record by id, failing with `NotFound`.
    pub async fn get(&self, id: &str) -> Result<E, AppError> {
        self.find_by_id(id).await?.ok_or_else(AppError::not_found)
    }

    /// Whether a record with this id exists.
    pub async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?", E::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// List records matching `filter` in the entity's default order.
    pub async fn find_many(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let mut query = Self::select(filter, false);
        let rows = query.build().fetch_all(self.pool).await?;

        Ok(rows.iter().map(E::from_row).collect::<Result<_, _>>()?)
    }

    /// List records matching `filter` together with the number of matches.
    pub async fn find_and_count(&self, filter: &E::Filter) -> Result<(Vec<E>, i64), AppError> {
        let mut query = Self::select(filter, true);
        let rows = query.build().fetch_all(self.pool).await?;

        let total: i64 = match rows.first() {
            Some(row) => row.try_get("total_count")?,
            None => 0,
        };
        let items: Vec<E> = rows.iter().map(E::from_row).collect::<Result<_, _>>()?;
        Ok((items, total))
    }

    /// Insert a new record, or overwrite the stored one with the same id.
    ///
    /// Uses an upsert rather than `INSERT OR REPLACE`, which would delete the
    /// old row and cascade to its children.
    pub async fn save(&self, entity: &E) -> Result<(), AppError> {
        let assignments = E::COLUMNS
            .iter()
            .filter(|column| **column != "id")
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            E::TABLE,
            Self::column_list()
        ));
        query.push_values(std::iter::once(entity), |mut row, entity| {
            entity.bind_values(&mut row)
        });
        query.push(" ON CONFLICT(id) DO UPDATE SET ").push(assignments);
        query.build().execute(self.pool).await?;

        tracing::trace!(table = E::TABLE, id = entity.id(), "Saved row");
        Ok(())
    }

    /// Persist a freshly built record and hand it back.
    pub async fn create(&self, entity: E) -> Result<E, AppError> {
        self.save(&entity).await?;
        Ok(entity)
    }

    /// Apply a partial patch to an existing record and return the result.
    pub async fn update_by_id(&self, id: &str, patch: &E::Patch) -> Result<E, AppError> {
        let mut entity = self.get(id).await?;
        entity.apply_patch(patch)?;
        entity.touch(timestamp());

        let mut query = QueryBuilder::new(format!(
            "UPDATE {} SET ({}) = (",
            E::TABLE,
            Self::column_list()
        ));
        entity.bind_values(&mut query.separated(", "));
        query.push(") WHERE id = ").push_bind(id.to_string());

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            // Deleted between read and write.
            return Err(AppError::not_found());
        }
        Ok(entity)
    }

    /// Delete by id. Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

// Helper functions for row conversion

/// Serialize an optional value into a JSON text column.
pub fn encode_json<T: Serialize>(value: &Option<T>) -> Option<String> {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v).unwrap_or_default())
}

/// Read an optional JSON text column.
pub fn decode_json<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<T>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

/// Read a text column holding an enumerated value.
pub fn decode_enum<T>(
    row: &SqliteRow,
    column: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse(&raw).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unexpected value '{}'", raw).into(),
    })
}
