pub mod datalink;
pub mod filter;
pub mod record;
pub mod tap;

pub use datalink::{DatalinkResolver, UrlResolver};
pub use filter::RecordFilter;
pub use record::CatalogRecord;
pub use tap::{CatalogService, TapCatalog};
