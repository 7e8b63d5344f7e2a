/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Longest city or content slug accepted from a client
pub const MAX_SLUG_LENGTH: usize = 64;
