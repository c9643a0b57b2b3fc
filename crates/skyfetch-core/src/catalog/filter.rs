use tracing::debug;

use crate::catalog::record::CatalogRecord;
use crate::pipeline::config::QueryConfig;

/// Client-side filter applied to catalog records after the name query.
///
/// A record survives iff its collection matches exactly and its release date
/// sorts strictly after the threshold. Dates are compared as zero-padded
/// ISO-8601 strings.
#[derive(Clone, Debug)]
pub struct RecordFilter {
    pub collection: String,
    pub release_after: String,
}

impl RecordFilter {
    pub fn new(collection: impl Into<String>, release_after: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            release_after: release_after.into(),
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.collection.clone(), config.release_after.clone())
    }

    pub fn matches_collection(&self, record: &CatalogRecord) -> bool {
        record.collection == self.collection
    }

    pub fn released_after(&self, record: &CatalogRecord) -> bool {
        record.data_release.as_str() > self.release_after.as_str()
    }

    pub fn accepts(&self, record: &CatalogRecord) -> bool {
        self.matches_collection(record) && self.released_after(record)
    }

    /// Apply the collection filter, then the release-date filter. Order is preserved.
    pub fn apply(&self, mut records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
        let total = records.len();
        records.retain(|r| self.matches_collection(r));
        let in_collection = records.len();
        records.retain(|r| self.released_after(r));
        debug!(
            total,
            in_collection,
            kept = records.len(),
            collection = %self.collection,
            release_after = %self.release_after,
            "Filtered catalog records"
        );
        records
    }
}
