use super::{AssociationKind, Hook, Model};
use crate::connection::Cursor;
use crate::db::{Db, Filter};
use crate::error::OrmResult;
use crate::value::{Data, Value};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// Result of a dynamic field read on a [`Record`].
#[derive(Debug, Clone)]
pub enum Field {
    /// A column value or scalar accessor result.
    Value(Value),
    /// A single related record (belongs-to, eager-loaded payload).
    Record(Box<Record>),
    /// A list of records returned by an accessor.
    Records(Vec<Record>),
    /// A has-many scope: the target model filtered to this record, not yet
    /// executed.
    Scope(Arc<Model>),
}

impl Field {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Field::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Field::Record(r) => Some(*r),
            _ => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Field::Records(rs) => Some(rs),
            _ => None,
        }
    }

    pub fn into_scope(self) -> Option<Arc<Model>> {
        match self {
            Field::Scope(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Value> for Field {
    fn from(v: Value) -> Self {
        Field::Value(v)
    }
}

impl From<Record> for Field {
    fn from(r: Record) -> Self {
        Field::Record(Box::new(r))
    }
}

impl From<&Record> for Field {
    fn from(r: &Record) -> Self {
        Field::Record(Box::new(r.clone()))
    }
}

impl From<Vec<Record>> for Field {
    fn from(rs: Vec<Record>) -> Self {
        Field::Records(rs)
    }
}

impl From<Arc<Model>> for Field {
    fn from(m: Arc<Model>) -> Self {
        Field::Scope(m)
    }
}

macro_rules! field_from_scalar {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Field {
            fn from(v: $ty) -> Self {
                Field::Value(Value::from(v))
            }
        })*
    };
}

field_from_scalar!(&str, String, bool, i32, i64, u32, u64, f64, chrono::NaiveDateTime);

/// One materialized row bound to its model.
#[derive(Clone)]
pub struct Record {
    model: Arc<Model>,
    data: Data,
    included: IndexMap<String, Record>,
}

impl Record {
    pub fn new(model: Arc<Model>, data: Data) -> Self {
        Self {
            model,
            data,
            included: IndexMap::new(),
        }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Raw column data.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// A literal column, without association or accessor fallback.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// Value of this record's primary key column.
    pub fn pk_value(&self) -> Option<&Value> {
        self.data.get(&self.model.pk())
    }

    /// An attached (eager-loaded) record.
    pub fn included(&self, name: &str) -> Option<&Record> {
        self.included.get(name)
    }

    /// Attach a related record under `name`, replacing any previous one.
    pub fn attach(&mut self, name: impl Into<String>, record: Record) {
        self.included.insert(name.into(), record);
    }

    /// Dynamic read. Tries, in order: literal columns and attached records,
    /// declared associations, computed accessors. `None` when nothing
    /// matches.
    pub fn get(&self, db: &mut Db, name: &str) -> OrmResult<Option<Field>> {
        if let Some(value) = self.data.get(name) {
            return Ok(Some(Field::Value(value.clone())));
        }
        if let Some(record) = self.included(name) {
            return Ok(Some(Field::Record(Box::new(record.clone()))));
        }
        if self.model.association(name).is_some() {
            return self.resolve(db, name);
        }
        self.call(db, name, &[])
    }

    /// Invoke a computed accessor with extra arguments.
    pub fn call(&self, db: &mut Db, name: &str, args: &[Value]) -> OrmResult<Option<Field>> {
        match self.model.accessor_fn(name) {
            Some(accessor) => accessor(db, self, args).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a declared association.
    ///
    /// - `belongs_to`: one `find` on the target by the key stored on this
    ///   record under the target's primary key name.
    /// - `has_many`: the target model scoped to this record (not executed).
    ///   With `through`, the join table is joined on the target's key and
    ///   filtered by this record's key.
    pub fn resolve(&self, db: &mut Db, name: &str) -> OrmResult<Option<Field>> {
        let Some(association) = self.model.association(name) else {
            return Ok(None);
        };
        let Some(target) = db.registry().target(association) else {
            return Ok(None);
        };

        match association.kind {
            AssociationKind::BelongsTo => {
                let id = match self.data.get(&target.pk()) {
                    Some(id) if !id.is_null() => id.clone(),
                    _ => return Ok(None),
                };
                Ok(target.find(db, id)?.map(Field::from))
            }
            AssociationKind::HasMany => {
                let own_pk = self.model.pk();
                let id = self.data.get(&own_pk).cloned().unwrap_or(Value::Null);
                let scoped = match &association.options.through {
                    Some(through) => {
                        let target_pk = target.pk();
                        let on = format!(
                            "{through}.{target_pk} = {}.{target_pk}",
                            target.qualifier()
                        );
                        (*target)
                            .clone()
                            .base_filter_join(through.clone(), on)
                            .base_filter(Data::new().set(format!("{through}.{own_pk}"), id))
                    }
                    None => (*target).clone().base_filter(Data::new().set(own_pk, id)),
                };
                Ok(Some(Field::Scope(Arc::new(scoped))))
            }
        }
    }

    fn pk_filter(&self) -> Filter {
        let id = self.pk_value().cloned().unwrap_or(Value::Null);
        Filter::Eq(Data::new().set(self.model.pk(), id))
    }

    /// Run `before_update`, `before_save`, the UPDATE, then `after_update`
    /// and `after_save`. Before-hook output feeds the SET list; both
    /// after-hooks receive exactly the data that was written.
    pub fn update(&self, db: &mut Db, data: Data) -> OrmResult<u64> {
        let model = Arc::clone(&self.model);
        let data = model.run_hook(db, Hook::BeforeUpdate, self, data)?;
        let data = model.run_hook(db, Hook::BeforeSave, self, data)?;

        let affected = db.update_where(&model.table(), &data, self.pk_filter())?;

        model.run_hook(db, Hook::AfterUpdate, self, data.clone())?;
        model.run_hook(db, Hook::AfterSave, self, data)?;
        Ok(affected)
    }

    /// Run `before_destroy`, the DELETE, then `after_destroy`.
    pub fn destroy(&self, db: &mut Db) -> OrmResult<u64> {
        let model = Arc::clone(&self.model);
        model.run_hook(db, Hook::BeforeDestroy, self, Data::new())?;

        let affected = db.destroy_where(&model.table(), self.pk_filter())?;

        model.run_hook(db, Hook::AfterDestroy, self, Data::new())?;
        Ok(affected)
    }

    /// `update` with no data: re-runs the hooks and issues an UPDATE whose
    /// SET list is whatever the hooks produce.
    pub fn touch(&self, db: &mut Db) -> OrmResult<u64> {
        self.update(db, Data::new())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Wrap every row of `cursor` into a record of `model`.
pub(crate) fn project(model: &Arc<Model>, cursor: &mut dyn Cursor) -> OrmResult<Vec<Record>> {
    let mut records = Vec::with_capacity(cursor.row_count());
    while let Some(row) = cursor.fetch_next()? {
        records.push(Record::new(Arc::clone(model), row));
    }
    Ok(records)
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len() + self.included.len()))?;
        for (k, v) in self.data.iter() {
            map.serialize_entry(k, v)?;
        }
        for (k, r) in &self.included {
            map.serialize_entry(k, r)?;
        }
        map.end()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("entity", &self.model.entity())
            .field("data", &self.data)
            .field("included", &self.included)
            .finish()
    }
}
