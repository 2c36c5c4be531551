//! Model descriptors, records and associations.
//!
//! A [`Model`] is the shared configuration for one entity type: table,
//! primary key, associations, lifecycle hooks and a base filter applied to
//! every multi-row query. Reads produce [`Record`]s bound back to their model.
//!
//! ```ignore
//! use sqlrow::{Data, Db, FindOptions, Hook, Model};
//!
//! db.register(Model::new("Author"));
//! db.register(Model::new("Tag"));
//! let post = db.register(
//!     Model::new("Post")
//!         .belongs_to("author")
//!         .has_many_through("tags", "post_tag")
//!         .handler("stamp", |_db, _row, data| Ok(data.set("edited", 1)))
//!         .before_save("stamp"),
//! );
//!
//! let posts = post.find_all(&mut db, FindOptions::new().include("author"))?;
//! let tags = posts[0].get(&mut db, "tags")?;
//! ```

mod eager;
mod find;
mod record;
mod registry;


pub use find::FindOptions;
pub use record::{Field, Record};
pub use registry::{Inflector, Registry, SimpleInflector};

use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::value::{Data, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A hook handler: receives the record and the pending data, returns the
/// (possibly transformed) data for the next handler.
pub type HookFn = Arc<dyn Fn(&mut Db, &Record, Data) -> OrmResult<Data> + Send + Sync>;

/// A computed accessor: `record.get("name")` falls back to these.
pub type AccessorFn = Arc<dyn Fn(&mut Db, &Record, &[Value]) -> OrmResult<Field> + Send + Sync>;

/// Lifecycle extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeSave,
    AfterSave,
    BeforeUpdate,
    AfterUpdate,
    BeforeDestroy,
    AfterDestroy,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BeforeSave => "before_save",
            Hook::AfterSave => "after_save",
            Hook::BeforeUpdate => "before_update",
            Hook::AfterUpdate => "after_update",
            Hook::BeforeDestroy => "before_destroy",
            Hook::AfterDestroy => "after_destroy",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    BelongsTo,
    HasMany,
}

/// Extra settings for an association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationOptions {
    /// Join table for many-to-many traversal (`has_many` only).
    pub through: Option<String>,
    /// Target entity name, when it differs from the association name.
    pub model: Option<String>,
}

impl AssociationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn through(mut self, table: impl Into<String>) -> Self {
        self.through = Some(table.into());
        self
    }

    pub fn model(mut self, entity: impl Into<String>) -> Self {
        self.model = Some(entity.into());
        self
    }
}

/// A declared relationship to another model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub name: String,
    pub kind: AssociationKind,
    pub options: AssociationOptions,
}

/// Per-entity configuration shared by all records of that entity.
#[derive(Clone)]
pub struct Model {
    entity: String,
    table_name: Option<String>,
    table_alias: Option<String>,
    primary_key: Option<String>,
    created_at_key: String,
    associations: Vec<Association>,
    hooks: HashMap<Hook, Vec<String>>,
    handlers: HashMap<String, HookFn>,
    accessors: HashMap<String, AccessorFn>,
    base_filter: Data,
    base_filter_joins: Vec<(String, String)>,
}

impl Model {
    /// Describe an entity. The table defaults to the lower-cased entity
    /// name and the primary key to `<table>_id`.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            table_name: None,
            table_alias: None,
            primary_key: None,
            created_at_key: "created_at".to_string(),
            associations: Vec::new(),
            hooks: HashMap::new(),
            handlers: HashMap::new(),
            accessors: HashMap::new(),
            base_filter: Data::new(),
            base_filter_joins: Vec::new(),
        }
    }

    // ==================== Configuration ====================

    pub fn table_name(mut self, table: impl Into<String>) -> Self {
        self.table_name = Some(table.into());
        self
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    /// Column used by `first` / `last` for ordering.
    pub fn created_at_key(mut self, key: impl Into<String>) -> Self {
        self.created_at_key = key.into();
        self
    }

    /// Replace the base filter applied to every `find_all`.
    pub fn base_filter(mut self, filter: impl Into<Data>) -> Self {
        self.base_filter = filter.into();
        self
    }

    /// Append a join applied to every `find_all`.
    pub fn base_filter_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.base_filter_joins.push((table.into(), on.into()));
        self
    }

    pub fn belongs_to(self, name: impl Into<String>) -> Self {
        self.associate(name, AssociationKind::BelongsTo, AssociationOptions::default())
    }

    pub fn belongs_to_with(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.associate(name, AssociationKind::BelongsTo, options)
    }

    pub fn has_many(self, name: impl Into<String>) -> Self {
        self.associate(name, AssociationKind::HasMany, AssociationOptions::default())
    }

    pub fn has_many_through(self, name: impl Into<String>, through: impl Into<String>) -> Self {
        self.associate(
            name,
            AssociationKind::HasMany,
            AssociationOptions::new().through(through),
        )
    }

    pub fn has_many_with(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.associate(name, AssociationKind::HasMany, options)
    }

    fn associate(
        mut self,
        name: impl Into<String>,
        kind: AssociationKind,
        options: AssociationOptions,
    ) -> Self {
        self.associations.push(Association {
            name: name.into(),
            kind,
            options,
        });
        self
    }

    /// Register a named hook handler.
    pub fn handler<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Db, &Record, Data) -> OrmResult<Data> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(f));
        self
    }

    /// Register a computed accessor reachable through `Record::get`/`call`.
    pub fn accessor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Db, &Record, &[Value]) -> OrmResult<Field> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(f));
        self
    }

    /// Append a handler name to a hook.
    pub fn hook(mut self, hook: Hook, handler: impl Into<String>) -> Self {
        self.hooks.entry(hook).or_default().push(handler.into());
        self
    }

    pub fn before_save(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::BeforeSave, handler)
    }

    pub fn after_save(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::AfterSave, handler)
    }

    pub fn before_update(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::BeforeUpdate, handler)
    }

    pub fn after_update(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::AfterUpdate, handler)
    }

    pub fn before_destroy(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::BeforeDestroy, handler)
    }

    pub fn after_destroy(self, handler: impl Into<String>) -> Self {
        self.hook(Hook::AfterDestroy, handler)
    }

    // ==================== Accessors ====================

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn table(&self) -> String {
        match &self.table_name {
            Some(table) => table.clone(),
            None => self.entity.to_lowercase(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    /// Alias if set, otherwise the table name. Used to qualify columns.
    pub fn qualifier(&self) -> String {
        match &self.table_alias {
            Some(alias) => alias.clone(),
            None => self.table(),
        }
    }

    /// `table alias` (or just `table`), used as the FROM target.
    pub fn from_clause(&self) -> String {
        match &self.table_alias {
            Some(alias) => format!("{} {}", self.table(), alias),
            None => self.table(),
        }
    }

    pub fn pk(&self) -> String {
        match &self.primary_key {
            Some(key) => key.clone(),
            None => format!("{}_id", self.table()),
        }
    }

    pub fn created_at(&self) -> &str {
        &self.created_at_key
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    pub fn base_filter_data(&self) -> &Data {
        &self.base_filter
    }

    pub fn base_filter_joins(&self) -> &[(String, String)] {
        &self.base_filter_joins
    }

    /// Handler names registered for `hook`, in order.
    pub fn hook_handlers(&self, hook: Hook) -> &[String] {
        self.hooks.get(&hook).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_accessor(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    pub(crate) fn accessor_fn(&self, name: &str) -> Option<AccessorFn> {
        self.accessors.get(name).cloned()
    }

    /// Run every handler registered for `hook`, in registration order,
    /// threading `data` through each. Returns the final data.
    pub fn run_hook(&self, db: &mut Db, hook: Hook, record: &Record, data: Data) -> OrmResult<Data> {
        let mut data = data;
        for name in self.hook_handlers(hook) {
            let handler = self
                .handlers
                .get(name)
                .ok_or_else(|| OrmError::UnknownHandler {
                    hook: hook.to_string(),
                    handler: name.clone(),
                })?;
            #[cfg(feature = "tracing")]
            tracing::trace!(entity = %self.entity, hook = %hook, handler = %name, "running hook");
            data = handler(db, record, data)?;
        }
        Ok(data)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        let mut accessors: Vec<&String> = self.accessors.keys().collect();
        accessors.sort();
        f.debug_struct("Model")
            .field("entity", &self.entity)
            .field("table", &self.table())
            .field("alias", &self.table_alias)
            .field("primary_key", &self.pk())
            .field("associations", &self.associations)
            .field("hooks", &self.hooks)
            .field("handlers", &handlers)
            .field("accessors", &accessors)
            .field("base_filter", &self.base_filter)
            .field("base_filter_joins", &self.base_filter_joins)
            .finish()
    }
}
