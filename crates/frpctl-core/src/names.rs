//! Random tunnel names for `add` without an explicit name.

use rand::RngCore;
use rand::rngs::OsRng;

/// Bytes of entropy per generated name (hex-encoded to twice as many chars).
const NAME_BYTES: usize = 8;

/// Generate a 16-character lowercase hex name from the OS CSPRNG.
///
/// Collisions are not retried: the caller's duplicate check rejects them.
pub fn generate_name() -> String {
    let mut bytes = [0u8; NAME_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
