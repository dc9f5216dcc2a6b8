//! Feature-reference resolution
//!
//! Turns a caller-supplied list of `table:feature` references into concrete
//! feature-table definitions, each pruned to only the requested features.
//!
//! References are grouped by table name across the whole list, preserving the
//! first-seen order of table names. Non-adjacent references to the same table
//! therefore merge into a single group and the result carries exactly one
//! definition per distinct table.

use featurelift_core::{FeatureRef, FeatureTable, Result};

use crate::registry::FeatureTableRegistry;

/// Resolves feature references into pruned feature-table definitions
///
/// For each distinct table name (first-seen order) the definition is fetched
/// from the registry and its feature list is reduced to the requested
/// features, keeping the registry's declared order. Requested features the
/// registry does not declare are dropped silently; an unknown table surfaces
/// as `TableNotFound`.
pub async fn resolve_feature_tables(
    registry: &dyn FeatureTableRegistry,
    feature_refs: &[FeatureRef],
    project: &str,
) -> Result<Vec<FeatureTable>> {
    // Group by table name, preserving first-seen table order.
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for feature_ref in feature_refs {
        match groups.iter_mut().find(|(t, _)| *t == feature_ref.table) {
            Some((_, features)) => {
                if !features.contains(&feature_ref.feature.as_str()) {
                    features.push(&feature_ref.feature);
                }
            }
            None => groups.push((&feature_ref.table, vec![&feature_ref.feature])),
        }
    }

    let mut tables = Vec::with_capacity(groups.len());
    for (table_name, requested) in groups {
        let mut table = registry.get_feature_table(table_name, project).await?;
        table
            .features
            .retain(|f| requested.iter().any(|r| r == f));
        tables.push(table);
    }

    Ok(tables)
}
