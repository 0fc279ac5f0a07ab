#![allow(missing_docs, dead_code)]

use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Routes `log` output through the test harness. Filter with `RUST_LOG`.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Splits `data` into pieces of `size` bytes, the last one possibly shorter.
pub fn pieces(data: &[u8], size: usize) -> Vec<Vec<u8>> {
    data.chunks(size.max(1)).map(<[u8]>::to_vec).collect()
}

/// A short line-based exchange, split at awkward places.
pub const SESSION: [&[u8]; 6] = [
    b"HELO example.org\r",
    b"\nMAIL FROM:<a@example.org>\r\nRC",
    b"PT TO:<b@example.org>",
    b"\r",
    b"\n",
    b"DATA\r\n",
];
