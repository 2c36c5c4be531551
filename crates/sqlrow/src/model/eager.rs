//! Eager loading of belongs-to associations.
//!
//! One `IN (...)` query per association, regardless of how many records own
//! it. Matching is a nested loop over owners × loaded rows, which is fine for
//! page-sized result sets but grows quadratically beyond that.

use super::record::project;
use super::{AssociationKind, Model, Record};
use crate::db::Db;
use crate::error::OrmResult;
use crate::value::Value;
use std::collections::HashSet;

/// Load `name` for every record in `records` and attach the matches.
///
/// Unknown associations and `has_many` associations are skipped; the latter
/// can only be resolved per record.
pub(crate) fn load_belongs_to(
    db: &mut Db,
    owner: &Model,
    records: &mut [Record],
    name: &str,
) -> OrmResult<()> {
    let Some(association) = owner.association(name) else {
        return Ok(());
    };
    if association.kind != AssociationKind::BelongsTo {
        #[cfg(feature = "tracing")]
        tracing::debug!(entity = %owner.entity(), association = %name, "has_many cannot be eager-loaded; skipping");
        return Ok(());
    }
    let Some(target) = db.registry().target(association) else {
        return Ok(());
    };

    let pk = target.pk();
    let ids = distinct_keys(records, &pk);
    if ids.is_empty() {
        return Ok(());
    }

    let list: Vec<String> = ids.iter().map(|id| db.literal(id)).collect();
    db.and_where(format!("( {} IN ({}) )", pk, list.join(",")));
    let mut cursor = db.get(&target.table())?;
    let related = project(&target, cursor.as_mut())?;

    for related_row in &related {
        let Some(related_id) = related_row.value(&pk) else {
            continue;
        };
        for record in records.iter_mut() {
            if record.value(&pk).is_some_and(|id| id.same_key(related_id)) {
                record.attach(name, related_row.clone());
            }
        }
    }
    Ok(())
}

/// Non-null values of `column` across `records`, first occurrence order.
fn distinct_keys(records: &[Record], column: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.value(column))
        .filter(|v| v.key().is_some_and(|k| seen.insert(k)))
        .cloned()
        .collect()
}
