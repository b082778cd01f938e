//! Short, URL-safe identifiers for items and events.
//!
//! Codes are drawn uniformly from a 64-symbol alphabet (`A-Z`, `a-z`,
//! `0-9`, `_`, `-`). Item codes double as the public share-link slug,
//! so they are kept short; event codes are longer because events are
//! far more numerous and never typed by hand.

use rand::seq::SliceRandom;

/// URL-safe alphabet used for every generated code.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of a jewelry item identifier.
pub const ITEM_ID_LEN: usize = 8;

/// Length of an analytics event identifier.
pub const EVENT_ID_LEN: usize = 16;

/// Generates a random code of `len` symbols from [`ALPHABET`].
#[must_use]
pub fn generate(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .filter_map(|_| ALPHABET.choose(&mut rng))
        .map(|&b| char::from(b))
        .collect()
}

/// Generates a new item identifier (also the share-link short code).
#[must_use]
pub fn new_item_id() -> String {
    generate(ITEM_ID_LEN)
}

/// Generates a new analytics event identifier.
#[must_use]
pub fn new_event_id() -> String {
    generate(EVENT_ID_LEN)
}
