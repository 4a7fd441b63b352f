/// Identity used when the caller does not specify one.
pub const DEFAULT_IDENTITY: &str = "default";

/// Price cache time-to-live in seconds. A snapshot at least this old
/// reads as absent.
pub const PRICE_CACHE_TTL_SECS: i64 = 5 * 60;

/// Quantity unit assigned when a new holding does not name one.
pub const DEFAULT_UNIT: &str = "units";
