/// Default target searched in the archive.
pub const DEFAULT_TARGET: &str = "NGC-1068-BK";

/// Default collection kept by the record filter (James Webb Space Telescope).
pub const DEFAULT_COLLECTION: &str = "JWST";

/// Default release-date threshold. Records must be released strictly after it.
pub const DEFAULT_RELEASE_AFTER: &str = "2022-10-29T00:00:00.000";

/// CADC TAP synchronous query endpoint.
pub const CADC_TAP_URL: &str = "https://ws-cadc.canfar.net/argus/sync";

/// CADC DataLink endpoint used to turn publisher IDs into download URLs.
pub const CADC_DATALINK_URL: &str =
    "https://ws.cadc-ccda.hia-iha.nrc-cnrc.gc.ca/caom2ops/datalink";

/// Maximum number of publisher IDs sent in one DataLink request.
pub const DATALINK_BATCH_SIZE: usize = 50;

/// DataLink semantics of the primary product of a record.
pub const SEMANTICS_THIS: &str = "#this";

/// DataLink semantics of the tar package bundling a whole plane. Never downloaded.
pub const SEMANTICS_PKG: &str = "http://www.opencadc.org/caom2#pkg";

/// User agent sent with every archive request.
pub const DEFAULT_USER_AGENT: &str = concat!("skyfetch/", env!("CARGO_PKG_VERSION"));

/// FITS logical record (block) size in bytes.
pub const FITS_BLOCK_SIZE: usize = 2880;

/// FITS header card size in bytes.
pub const FITS_CARD_SIZE: usize = 80;

/// Index of the HDU the pipeline inspects (first extension after the primary).
pub const IMAGE_HDU_INDEX: usize = 1;

/// Highest dimensionality that can be reduced to a displayable plane.
pub const MAX_RENDER_DIMS: usize = 3;

/// Minimum pixel count (h*w) to use rayon when computing display statistics.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default low clip fraction for percentile stretching.
pub const DEFAULT_LOW_PERCENTILE: f32 = 0.005;

/// Default high clip fraction for percentile stretching.
pub const DEFAULT_HIGH_PERCENTILE: f32 = 0.995;
