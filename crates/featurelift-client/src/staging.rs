//! Entity staging decision logic
//!
//! An in-memory entity dataset has to be materialized somewhere the execution
//! backend can read before a retrieval job can consume it. This module owns
//! the *decision* of where that is; the physical copy is performed by the
//! injected [`EntityStaging`] collaborator.
//!
//! The decision is all-or-nothing per call: if any resolved feature table is
//! backed by BigQuery, the dataset is uploaded next to the first such source;
//! otherwise it is serialized to a fresh unique path under the configured
//! file staging location. Mixed-backend feature sets bias toward BigQuery.

use std::sync::Arc;

use async_trait::async_trait;
use featurelift_core::{
    BigQuerySource, BigQueryTableRef, EntityDataset, EntitySource, FeatureTable, FileSource,
    Result,
};
use uuid::Uuid;

/// Contract of the staging utilities that physically copy entity data
///
/// Implementations upload or serialize the dataset and return a source
/// description pointing at the staged copy. Failures surface as
/// `Error::Staging` and abort job submission.
#[async_trait]
pub trait EntityStaging: Send + Sync {
    /// Uploads the dataset as a (possibly temporary) table in the given
    /// warehouse project and dataset
    async fn stage_to_bigquery(
        &self,
        dataset: &EntityDataset,
        project: &str,
        dataset_id: &str,
    ) -> Result<BigQuerySource>;

    /// Serializes the dataset to a file artifact at the given URI
    async fn stage_to_file(&self, dataset: &EntityDataset, target_uri: &str)
        -> Result<FileSource>;
}

/// Decides whether and where an entity source gets staged
pub struct EntityStager {
    staging: Arc<dyn EntityStaging>,
    staging_location: String,
}

impl EntityStager {
    pub fn new(staging: Arc<dyn EntityStaging>, staging_location: impl Into<String>) -> Self {
        Self {
            staging,
            staging_location: staging_location.into(),
        }
    }

    /// Stages an in-memory dataset; already-staged sources pass through
    ///
    /// The target is chosen from the batch sources of the resolved feature
    /// tables: the first BigQuery source wins, otherwise a fresh unique path
    /// under the file staging location is generated. The generated path is
    /// never reused across calls.
    pub async fn maybe_stage(
        &self,
        entity_source: EntitySource,
        feature_tables: &[FeatureTable],
    ) -> Result<EntitySource> {
        let dataset = match entity_source {
            EntitySource::Dataset(dataset) => dataset,
            staged => return Ok(staged),
        };

        let first_bigquery = feature_tables
            .iter()
            .find_map(|table| table.batch_source.as_bigquery());

        if let Some(source) = first_bigquery {
            let table_ref = BigQueryTableRef::parse(&source.table_ref)?;
            tracing::debug!(
                project = %table_ref.project,
                dataset = %table_ref.dataset,
                rows = dataset.row_count(),
                "Staging entity dataset to BigQuery"
            );
            let staged = self
                .staging
                .stage_to_bigquery(&dataset, &table_ref.project, &table_ref.dataset)
                .await?;
            Ok(EntitySource::BigQuery(staged))
        } else {
            let target_uri = format!(
                "{}/{}",
                self.staging_location.trim_end_matches('/'),
                Uuid::new_v4()
            );
            tracing::debug!(
                target = %target_uri,
                rows = dataset.row_count(),
                "Staging entity dataset to file storage"
            );
            let staged = self.staging.stage_to_file(&dataset, &target_uri).await?;
            Ok(EntitySource::File(staged))
        }
    }
}
