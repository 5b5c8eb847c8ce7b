/// Maximum size of a single wire frame in bytes
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;      // 64 KB per line
/// Largest frame limit a configuration may set
pub const CEILING_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;
/// Seconds a session waits for each client frame before giving up
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;
/// Longest per-frame wait a configuration may set
pub const CEILING_READ_TIMEOUT_SECS: u64 = 3600;
/// Pause after a failed accept before trying again
pub const ACCEPT_BACKOFF_MS: u64 = 200;
/// How long a closing session keeps discarding unread client input
pub const CLOSE_DRAIN_MS: u64 = 500;
