use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use uuid::Builder;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A lowercase hyphenated v4 UUID.
///
/// Bytes come from the operating system's secure source. When that source
/// cannot be read, a clock-seeded splitmix64 stream fills them instead, so the
/// result keeps the same textual shape either way.
pub fn new_workout_id() -> String {
    let mut bytes = [0u8; 16];
    if let Err(err) = getrandom::getrandom(&mut bytes) {
        warn!("secure random source unavailable, using fallback ids: {err}");
        fallback_bytes(&mut bytes);
    }
    format_id(bytes)
}

fn format_id(bytes: [u8; 16]) -> String {
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

fn fallback_bytes(bytes: &mut [u8; 16]) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut state = nanos ^ counter.rotate_left(32) ^ u64::from(std::process::id());

    for chunk in bytes.chunks_mut(8) {
        let value = splitmix64(&mut state).to_le_bytes();
        chunk.copy_from_slice(&value[..chunk.len()]);
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
