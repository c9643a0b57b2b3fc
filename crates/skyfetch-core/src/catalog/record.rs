use serde::{Deserialize, Serialize};

/// One observation plane returned by the archive catalog.
///
/// Field names follow the CAOM2 column names of the TAP response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub collection: String,
    #[serde(rename = "observationID", default)]
    pub observation_id: String,
    #[serde(default)]
    pub target_name: String,
    #[serde(rename = "productID", default)]
    pub product_id: String,
    /// IVOA identifier handed to DataLink to obtain download URLs.
    #[serde(rename = "publisherID")]
    pub publisher_id: String,
    /// ISO-8601 timestamp, empty when the archive has none.
    #[serde(rename = "dataRelease", default)]
    pub data_release: String,
    #[serde(rename = "calibrationLevel", default)]
    pub calibration_level: Option<i32>,
    #[serde(rename = "dataProductType", default)]
    pub data_product_type: Option<String>,
}
