//! Metadata registry contract
//!
//! The registry that owns feature-table definitions lives outside this crate;
//! only its lookup contract is consumed here.

use async_trait::async_trait;
use featurelift_core::{FeatureTable, Result};

/// Lookup interface of the feature-store metadata registry
///
/// Implementations are expected to be safe for concurrent use; the client
/// shares one instance across calls.
#[async_trait]
pub trait FeatureTableRegistry: Send + Sync {
    /// Fetches a feature table definition by name within a project
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if no table with that name exists in the project
    async fn get_feature_table(&self, name: &str, project: &str) -> Result<FeatureTable>;
}
