//! # FeatureLift Core Library
//!
//! Foundation crate for FeatureLift, holding the data model, error taxonomy
//! and configuration shared by the job client and its collaborators.
//!
//! ## Key Components
//!
//! - **Types**: feature references and tables, batch/stream sources,
//!   in-memory entity datasets, job kind and status
//! - **Errors**: strongly-typed error handling via `thiserror`
//! - **Config**: the flat per-client configuration, including the
//!   job-service section that selects local vs. remote execution

// Re-export commonly used types for convenience
pub use config::{
    load_config, ClientConfig, HistoricalOutputConfig, JobServiceConfig, StagingConfig,
};
pub use error::{Error, Result};
pub use types::{
    BatchSource, BigQuerySource, BigQueryTableRef, ColumnValues, EntityColumn, EntityDataset,
    EntitySource, FeatureRef, FeatureTable, FileFormat, FileSource, JobKind, JobStatus,
    StreamSource, EVENT_TIMESTAMP_COLUMN,
};

mod config;
mod error;
mod types;

// Prelude module - commonly used imports
pub mod prelude {
    pub use crate::config::{load_config, ClientConfig, JobServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        BatchSource, BigQuerySource, EntityDataset, EntitySource, FeatureRef, FeatureTable,
        FileFormat, FileSource, JobKind, JobStatus,
    };
}
