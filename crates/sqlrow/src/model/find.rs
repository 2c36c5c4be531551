use super::record::{Field, project};
use super::{Model, Record, eager};
use crate::db::{Db, Filter};
use crate::error::{OrmError, OrmResult};
use crate::value::{Data, Value};
use std::sync::Arc;

/// Options for a multi-row [`Model::find_all`].
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub filters: Vec<Filter>,
    pub having: Vec<Filter>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// `"field"` or `"field DIR"`. Blank means no ordering.
    pub order: Option<String>,
    pub select: Option<String>,
    /// Belongs-to associations to eager-load.
    pub include: Vec<String>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn having(mut self, filter: impl Into<Filter>) -> Self {
        self.having.push(filter.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only applied together with a limit.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn include(mut self, association: impl Into<String>) -> Self {
        self.include.push(association.into());
        self
    }
}

impl Model {
    /// Single-row lookup by primary key. `None` when no row matches.
    pub fn find(self: &Arc<Self>, db: &mut Db, id: impl Into<Value>) -> OrmResult<Option<Record>> {
        let key = format!("{}.{}", self.qualifier(), self.pk());
        db.and_where(Filter::Eq(Data::new().set(key, id))).limit(1, 0);
        let mut cursor = db.get(&self.from_clause())?;
        if cursor.row_count() == 0 {
            return Ok(None);
        }
        Ok(cursor
            .fetch_next()?
            .map(|row| Record::new(Arc::clone(self), row)))
    }

    /// Multi-row query. The base filter and base joins are applied first,
    /// then `options`. Included belongs-to associations are loaded with one
    /// extra query each.
    pub fn find_all(self: &Arc<Self>, db: &mut Db, options: FindOptions) -> OrmResult<Vec<Record>> {
        db.and_where(self.base_filter_data());
        for (table, on) in self.base_filter_joins() {
            db.join(table, on);
        }
        for filter in options.filters {
            db.and_where(filter);
        }
        for filter in options.having {
            db.and_having(filter);
        }
        if let Some(limit) = options.limit.filter(|&n| n > 0) {
            db.limit(limit, options.offset.unwrap_or(0));
        }
        let order = options.order.as_deref().map(str::trim).filter(|o| !o.is_empty());
        if let Some(order) = order {
            let parts: Vec<&str> = order.split_whitespace().collect();
            match parts.as_slice() {
                [field, direction] => db.order(field, direction),
                _ => db.order_asc(parts[0]),
            };
        }
        if let Some(select) = &options.select {
            db.select(select);
        }

        let mut cursor = db.get(&self.from_clause())?;
        let mut records = project(self, cursor.as_mut())?;

        for name in &options.include {
            eager::load_belongs_to(db, self, &mut records, name)?;
        }
        Ok(records)
    }

    /// First record by the created-at key, ascending.
    pub fn first(self: &Arc<Self>, db: &mut Db, options: FindOptions) -> OrmResult<Option<Record>> {
        let order = format!("{} ASC", self.created_at());
        self.find_one(db, options, order)
    }

    /// First record by the created-at key, descending.
    pub fn last(self: &Arc<Self>, db: &mut Db, options: FindOptions) -> OrmResult<Option<Record>> {
        let order = format!("{} DESC", self.created_at());
        self.find_one(db, options, order)
    }

    /// Delegates to [`Model::last`] (newest first), matching historic
    /// behaviour. Use [`Model::first`] for the oldest record.
    pub fn earliest(self: &Arc<Self>, db: &mut Db) -> OrmResult<Option<Record>> {
        self.last(db, FindOptions::new())
    }

    /// Delegates to [`Model::last`].
    pub fn latest(self: &Arc<Self>, db: &mut Db) -> OrmResult<Option<Record>> {
        self.last(db, FindOptions::new())
    }

    fn find_one(
        self: &Arc<Self>,
        db: &mut Db,
        mut options: FindOptions,
        default_order: String,
    ) -> OrmResult<Option<Record>> {
        options.limit.get_or_insert(1);
        options.order.get_or_insert(default_order);
        Ok(self.find_all(db, options)?.into_iter().next())
    }

    /// `COUNT(<qualifier>.<pk>)` over the filtered set.
    pub fn count(self: &Arc<Self>, db: &mut Db, options: FindOptions) -> OrmResult<i64> {
        let options = options.select(format!("COUNT({}.{}) AS count", self.qualifier(), self.pk()));
        let rows = self.find_all(db, options)?;
        Ok(rows
            .first()
            .and_then(|row| row.value("count"))
            .and_then(Value::as_i64)
            .unwrap_or(0))
    }

    /// Insert a row and return it, located by the connection's last insert id.
    ///
    /// A record value is replaced by its primary key, stored under the
    /// related model's primary key name. Pending builder state is neither
    /// consulted nor cleared.
    pub fn create<I, K, F>(self: &Arc<Self>, db: &mut Db, fields: I) -> OrmResult<Option<Record>>
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<Field>,
    {
        let mut data = Data::new();
        for (key, field) in fields {
            let key = key.into();
            match field.into() {
                Field::Value(value) => data.insert(key, value),
                Field::Record(record) => {
                    let id = record.pk_value().cloned().unwrap_or(Value::Null);
                    data.insert(record.model().pk(), id);
                }
                Field::Records(_) | Field::Scope(_) => return Err(OrmError::non_scalar(key)),
            }
        }

        db.create(&self.table(), &data)?;
        match db.last_insert_id() {
            Some(id) => self.find(db, id),
            None => Ok(None),
        }
    }

    /// Find by id and run [`Record::update`]. Returns false when missing.
    pub fn update(self: &Arc<Self>, db: &mut Db, id: impl Into<Value>, data: Data) -> OrmResult<bool> {
        match self.find(db, id)? {
            Some(record) => {
                record.update(db, data)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Find by id and run [`Record::destroy`]. Returns false when missing.
    pub fn destroy(self: &Arc<Self>, db: &mut Db, id: impl Into<Value>) -> OrmResult<bool> {
        match self.find(db, id)? {
            Some(record) => {
                record.destroy(db)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
