//! Core data types for FeatureLift
//!
//! This module defines the data model shared by the job client and its
//! collaborators: feature references and tables, batch/stream sources,
//! in-memory entity datasets, and job metadata (kind and status).
//!
//! Feature values themselves never flow through these types. The client only
//! describes *where* data lives and *which* features a job should compute;
//! the execution backend does the heavy lifting.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Column name entity datasets must carry for point-in-time joins
pub const EVENT_TIMESTAMP_COLUMN: &str = "event_timestamp";

/// Reference to a single feature, written as `table:feature`
///
/// # Examples
///
/// ```
/// use featurelift_core::FeatureRef;
///
/// let fr = FeatureRef::parse("bookings:bookings_7d").unwrap();
/// assert_eq!(fr.table, "bookings");
/// assert_eq!(fr.feature, "bookings_7d");
/// assert_eq!(fr.to_string(), "bookings:bookings_7d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureRef {
    /// Name of the feature table the feature belongs to
    pub table: String,

    /// Name of the feature within that table
    pub feature: String,
}

impl FeatureRef {
    /// Parses a `table:feature` string
    ///
    /// Both parts must be non-empty and the feature part must not itself
    /// contain a colon.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((table, feature))
                if !table.is_empty() && !feature.is_empty() && !feature.contains(':') =>
            {
                Ok(Self {
                    table: table.to_string(),
                    feature: feature.to_string(),
                })
            }
            _ => Err(Error::InvalidFeatureRef(s.to_string())),
        }
    }

    /// Parses a list of reference strings, failing on the first malformed one
    pub fn parse_many<S: AsRef<str>>(refs: &[S]) -> Result<Vec<Self>> {
        refs.iter().map(|r| Self::parse(r.as_ref())).collect()
    }
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.feature)
    }
}

impl FromStr for FeatureRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// File format of a file-based source or a retrieval output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Parquet,
    Csv,
    Avro,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Avro => "avro",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-based batch source (object storage or local filesystem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
    /// URI of the file artifact or directory (e.g. "gs://bucket/customers")
    pub path: String,

    /// Format of the stored data
    pub format: FileFormat,

    /// Column holding the event timestamp of each row
    pub event_timestamp_column: String,

    /// Column holding the row creation timestamp
    ///
    /// Required on sources used for historical retrieval; optional elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp_column: Option<String>,
}

impl FileSource {
    pub fn new(
        path: impl Into<String>,
        format: FileFormat,
        event_timestamp_column: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            format,
            event_timestamp_column: event_timestamp_column.into(),
            created_timestamp_column: None,
        }
    }

    pub fn with_created_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.created_timestamp_column = Some(column.into());
        self
    }
}

/// Warehouse-based batch source (BigQuery table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigQuerySource {
    /// Fully qualified table reference, written as `project:dataset.table`
    pub table_ref: String,

    /// Column holding the event timestamp of each row
    pub event_timestamp_column: String,

    /// Column holding the row creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp_column: Option<String>,
}

impl BigQuerySource {
    pub fn new(table_ref: impl Into<String>, event_timestamp_column: impl Into<String>) -> Self {
        Self {
            table_ref: table_ref.into(),
            event_timestamp_column: event_timestamp_column.into(),
            created_timestamp_column: None,
        }
    }

    pub fn with_created_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.created_timestamp_column = Some(column.into());
        self
    }
}

/// Where the historical values of a feature table live
///
/// The variant drives the staging decision for in-memory entity data: any
/// BigQuery-backed table biases staging toward the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchSource {
    File(FileSource),
    BigQuery(BigQuerySource),
}

impl BatchSource {
    /// Column holding the event timestamp, regardless of variant
    pub fn event_timestamp_column(&self) -> &str {
        match self {
            Self::File(s) => &s.event_timestamp_column,
            Self::BigQuery(s) => &s.event_timestamp_column,
        }
    }

    /// Column holding the creation timestamp, if declared
    pub fn created_timestamp_column(&self) -> Option<&str> {
        match self {
            Self::File(s) => s.created_timestamp_column.as_deref(),
            Self::BigQuery(s) => s.created_timestamp_column.as_deref(),
        }
    }

    /// Returns the BigQuery source if this is the warehouse variant
    pub fn as_bigquery(&self) -> Option<&BigQuerySource> {
        match self {
            Self::BigQuery(s) => Some(s),
            Self::File(_) => None,
        }
    }
}

/// Parsed BigQuery table reference (`project:dataset.table`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigQueryTableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl BigQueryTableRef {
    /// Parses a `project:dataset.table` string
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || {
            Error::precondition(format!(
                "malformed BigQuery table reference '{s}' (expected 'project:dataset.table')"
            ))
        };

        let (project, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (dataset, table) = rest.split_once('.').ok_or_else(malformed)?;
        if project.is_empty() || dataset.is_empty() || table.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        })
    }
}

impl fmt::Display for BigQueryTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.project, self.dataset, self.table)
    }
}

/// Kafka-shaped stream source feeding stream-to-online ingestion
///
/// Carried on feature tables but not interpreted by the client; the
/// execution backend consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSource {
    pub bootstrap_servers: String,
    pub topic: String,
    pub event_timestamp_column: String,
}

/// Definition of a feature table as returned by the metadata registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    /// Unique table name within a project
    pub name: String,

    /// Declared feature names, in registry order
    pub features: Vec<String>,

    /// Where historical feature values live
    pub batch_source: BatchSource,

    /// Stream source, present only for tables that support stream ingestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_source: Option<StreamSource>,
}

impl FeatureTable {
    pub fn new(
        name: impl Into<String>,
        features: Vec<String>,
        batch_source: BatchSource,
    ) -> Self {
        Self {
            name: name.into(),
            features,
            batch_source,
            stream_source: None,
        }
    }

    pub fn with_stream_source(mut self, source: StreamSource) -> Self {
        self.stream_source = Some(source);
        self
    }
}

/// Typed values of a single entity-dataset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
    /// Timezone-naive timestamps; the required type of the event-timestamp column
    Timestamp(Vec<NaiveDateTime>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if this column holds timezone-naive timestamps
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp(_))
    }
}

/// Named column of an in-memory entity dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityColumn {
    pub name: String,
    pub values: ColumnValues,
}

/// In-memory entity rows plus timestamps
///
/// The caller-facing equivalent of a small dataframe: entity key columns plus
/// an `event_timestamp` column of timezone-naive timestamps. Before a job can
/// consume it, the dataset is staged to a location the execution backend can
/// read.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use featurelift_core::{ColumnValues, EntityDataset};
///
/// let ts = NaiveDate::from_ymd_opt(2021, 8, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let dataset = EntityDataset::new()
///     .with_column("driver_id", ColumnValues::Int(vec![1001, 1002]))
///     .with_column("event_timestamp", ColumnValues::Timestamp(vec![ts, ts]));
/// assert_eq!(dataset.row_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDataset {
    columns: Vec<EntityColumn>,
}

impl EntityDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column (builder pattern)
    pub fn with_column(mut self, name: impl Into<String>, values: ColumnValues) -> Self {
        self.columns.push(EntityColumn {
            name: name.into(),
            values,
        });
        self
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&EntityColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[EntityColumn] {
        &self.columns
    }

    /// Number of rows, taken from the first column
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }
}

/// Source of the entity rows for a historical retrieval
///
/// An in-memory dataset gets staged before submission; file and warehouse
/// variants are read in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntitySource {
    Dataset(EntityDataset),
    File(FileSource),
    BigQuery(BigQuerySource),
}

impl EntitySource {
    /// True if the source is already readable by the execution backend
    pub fn is_staged(&self) -> bool {
        !matches!(self, Self::Dataset(_))
    }
}

/// Lifecycle state of a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Starting,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// True once the job can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Discriminant for the three job families the client can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    HistoricalRetrieval,
    BatchIngestion,
    StreamIngestion,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HistoricalRetrieval => "historical_retrieval",
            Self::BatchIngestion => "batch_ingestion",
            Self::StreamIngestion => "stream_ingestion",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_feature_ref_parse() {
        let fr = FeatureRef::parse("bookings:bookings_7d").unwrap();
        assert_eq!(fr.table, "bookings");
        assert_eq!(fr.feature, "bookings_7d");
    }

    #[test]
    fn test_feature_ref_parse_rejects_malformed() {
        for bad in ["bookings", ":bookings_7d", "bookings:", "a:b:c", ""] {
            let err = FeatureRef::parse(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidFeatureRef(_)), "input: {bad}");
        }
    }

    #[test]
    fn test_feature_ref_roundtrip() {
        let fr: FeatureRef = "driver:conv_rate".parse().unwrap();
        assert_eq!(fr.to_string(), "driver:conv_rate");
    }

    #[test]
    fn test_bigquery_table_ref_parse() {
        let r = BigQueryTableRef::parse("gcp-project:dataset_a.events").unwrap();
        assert_eq!(r.project, "gcp-project");
        assert_eq!(r.dataset, "dataset_a");
        assert_eq!(r.table, "events");
        assert_eq!(r.to_string(), "gcp-project:dataset_a.events");
    }

    #[test]
    fn test_bigquery_table_ref_rejects_malformed() {
        for bad in ["project", "project:dataset", "project:.table", ":ds.table"] {
            let err = BigQueryTableRef::parse(bad).unwrap_err();
            assert!(matches!(err, Error::Precondition(_)), "input: {bad}");
        }
    }

    #[test]
    fn test_batch_source_accessors() {
        let file = BatchSource::File(
            FileSource::new("file:///data/events", FileFormat::Parquet, "event_ts")
                .with_created_timestamp_column("created_ts"),
        );
        assert_eq!(file.event_timestamp_column(), "event_ts");
        assert_eq!(file.created_timestamp_column(), Some("created_ts"));
        assert!(file.as_bigquery().is_none());

        let bq = BatchSource::BigQuery(BigQuerySource::new("p:d.t", "event_ts"));
        assert!(bq.as_bigquery().is_some());
        assert_eq!(bq.created_timestamp_column(), None);
    }

    #[test]
    fn test_entity_dataset_columns() {
        let ts = NaiveDate::from_ymd_opt(2021, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dataset = EntityDataset::new()
            .with_column("driver_id", ColumnValues::Int(vec![1, 2, 3]))
            .with_column(EVENT_TIMESTAMP_COLUMN, ColumnValues::Timestamp(vec![ts; 3]));

        assert_eq!(dataset.row_count(), 3);
        let col = dataset.column(EVENT_TIMESTAMP_COLUMN).unwrap();
        assert!(col.values.is_timestamp());
        assert!(dataset.column("missing").is_none());
    }

    #[test]
    fn test_entity_source_is_staged() {
        assert!(!EntitySource::Dataset(EntityDataset::new()).is_staged());
        assert!(EntitySource::File(FileSource::new(
            "file:///tmp/entities",
            FileFormat::Parquet,
            "event_timestamp"
        ))
        .is_staged());
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Starting.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_job_kind_serde_tags() {
        let json = serde_json::to_string(&JobKind::HistoricalRetrieval).unwrap();
        assert_eq!(json, "\"historical_retrieval\"");
        let kind: JobKind = serde_json::from_str("\"stream_ingestion\"").unwrap();
        assert_eq!(kind, JobKind::StreamIngestion);
    }
}
