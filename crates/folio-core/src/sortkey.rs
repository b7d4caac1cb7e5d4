//! Fractional sort keys for card ordering.
//!
//! Keys are strings over a base-62 digit alphabet, compared bytewise. A key
//! is an integer part (whose leading char encodes its length, so longer
//! integers still compare correctly) followed by an optional fraction that
//! never ends in the zero digit. The first key in an empty collection is
//! `"a0"`.
//!
//! The one property everything else leans on: [`key_between`] always finds a
//! key strictly between any two existing keys. When two keys are adjacent in
//! the integer space it extends the fraction instead of failing, so repeated
//! bisection grows key length but never errors. Errors are reserved for
//! malformed input or misordered bounds.

use smol_str::SmolStr;
use thiserror::Error;

use crate::card::{Card, CardId};

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: usize = 62;

/// The minimum representable integer part: head `'A'` plus 26 zero digits.
const SMALLEST_INTEGER: &str = "A00000000000000000000000000";

/// Errors from sort-key operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SortKeyError {
    /// Key contains invalid characters, a bad head, or a trailing zero fraction.
    #[error("invalid sort key: {0:?}")]
    InvalidKey(SmolStr),

    /// Lower bound does not sort strictly below upper bound.
    #[error("sort keys out of order: {0:?} >= {1:?}")]
    OutOfOrder(SmolStr, SmolStr),

    /// The integer key space has no room left in the requested direction.
    #[error("integer key space exhausted")]
    Exhausted,

    /// Referenced card id is not present in the collection.
    #[error("unknown card id: {0}")]
    UnknownCard(CardId),
}

fn digit_value(c: u8) -> Option<usize> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 10),
        b'a'..=b'z' => Some((c - b'a') as usize + 36),
        _ => None,
    }
}

/// Integer-part length encoded by the head char: `'a'` = 2 chars up to
/// `'z'` = 27, and mirrored `'Z'` = 2 down to `'A'` = 27 for the low range.
fn integer_length(head: u8) -> Result<usize, SortKeyError> {
    match head {
        b'a'..=b'z' => Ok((head - b'a') as usize + 2),
        b'A'..=b'Z' => Ok((b'Z' - head) as usize + 2),
        _ => Err(SortKeyError::InvalidKey(SmolStr::new(
            (head as char).to_string(),
        ))),
    }
}

fn integer_part(key: &str) -> Result<&str, SortKeyError> {
    let head = key
        .as_bytes()
        .first()
        .copied()
        .ok_or_else(|| SortKeyError::InvalidKey(key.into()))?;
    let len = integer_length(head)?;
    if key.len() < len {
        return Err(SortKeyError::InvalidKey(key.into()));
    }
    Ok(&key[..len])
}

fn validate_key(key: &str) -> Result<(), SortKeyError> {
    let int = integer_part(key)?;
    if !key.bytes().all(|c| digit_value(c).is_some()) {
        return Err(SortKeyError::InvalidKey(key.into()));
    }
    // The fraction must not end in the zero digit, or the key would have a
    // second spelling and midpoints above it would collide.
    if key.len() > int.len() && key.ends_with('0') {
        return Err(SortKeyError::InvalidKey(key.into()));
    }
    Ok(())
}

/// Midpoint of two fraction strings, `a < b` (open upper bound when `None`).
/// Inputs are validated digit strings without trailing zeros.
fn midpoint(a: &[u8], b: Option<&[u8]>) -> Vec<u8> {
    if let Some(b) = b {
        // Shared prefix, treating `a` as zero-padded on the right.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(b'0') == b[n] {
            n += 1;
        }
        debug_assert!(n < b.len(), "midpoint bounds must satisfy a < b");
        if n > 0 {
            let mut out = b[..n].to_vec();
            let a_rest = if n <= a.len() { &a[n..] } else { &[][..] };
            out.extend(midpoint(a_rest, Some(&b[n..])));
            return out;
        }
    }

    let digit_a = a
        .first()
        .map(|&c| digit_value(c).unwrap_or(0))
        .unwrap_or(0);
    let digit_b = b
        .and_then(|b| b.first())
        .map(|&c| digit_value(c).unwrap_or(0))
        .unwrap_or(BASE);

    if digit_b - digit_a > 1 {
        // Round half up, matching the reference fractional-indexing scheme.
        let mid = (digit_a + digit_b + 1) / 2;
        vec![DIGITS[mid]]
    } else if b.is_some_and(|b| b.len() > 1) {
        // b = [digit_a + 1, more...]; its first digit alone sorts below it.
        vec![b.map(|b| b[0]).unwrap_or(DIGITS[digit_a])]
    } else {
        // Consecutive digits: keep a's digit and bisect the tail.
        let a_rest = if a.is_empty() { &[][..] } else { &a[1..] };
        let mut out = vec![DIGITS[digit_a]];
        out.extend(midpoint(a_rest, None));
        out
    }
}

/// Increment an integer part. `Ok(None)` means the positive space is maxed out.
fn increment_integer(int: &str) -> Result<Option<SmolStr>, SortKeyError> {
    let head = int.as_bytes()[0];
    let mut digits = int.as_bytes()[1..].to_vec();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        let v = digit_value(*d).unwrap_or(0) + 1;
        if v == BASE {
            *d = b'0';
        } else {
            *d = DIGITS[v];
            carry = false;
            break;
        }
    }
    if carry {
        if head == b'Z' {
            return Ok(Some(SmolStr::new_static("a0")));
        }
        if head == b'z' {
            return Ok(None);
        }
        let h = head + 1;
        if h > b'a' {
            // Positive integers grow one digit when the head advances.
            digits.push(b'0');
        } else {
            digits.pop();
        }
        return Ok(Some(build_key(h, &digits, &[])));
    }
    Ok(Some(build_key(head, &digits, &[])))
}

/// Decrement an integer part. `Ok(None)` means the negative space is maxed out.
fn decrement_integer(int: &str) -> Result<Option<SmolStr>, SortKeyError> {
    let head = int.as_bytes()[0];
    let mut digits = int.as_bytes()[1..].to_vec();
    let mut borrow = true;
    for d in digits.iter_mut().rev() {
        match digit_value(*d).unwrap_or(0) {
            0 => *d = b'z',
            v => {
                *d = DIGITS[v - 1];
                borrow = false;
                break;
            }
        }
    }
    if borrow {
        if head == b'a' {
            return Ok(Some(SmolStr::new_static("Zz")));
        }
        if head == b'A' {
            return Ok(None);
        }
        let h = head - 1;
        if h < b'Z' {
            // Negative integers grow one digit when the head recedes.
            digits.push(b'z');
        } else {
            digits.pop();
        }
        return Ok(Some(build_key(h, &digits, &[])));
    }
    Ok(Some(build_key(head, &digits, &[])))
}

fn build_key(head: u8, digits: &[u8], fraction: &[u8]) -> SmolStr {
    let mut out = Vec::with_capacity(1 + digits.len() + fraction.len());
    out.push(head);
    out.extend_from_slice(digits);
    out.extend_from_slice(fraction);
    // Bytes come straight from the digit alphabet.
    SmolStr::new(String::from_utf8_lossy(&out))
}

fn concat(int: &str, fraction: &[u8]) -> SmolStr {
    let mut out = String::with_capacity(int.len() + fraction.len());
    out.push_str(int);
    out.push_str(&String::from_utf8_lossy(fraction));
    SmolStr::new(out)
}

/// Generate a key strictly between `lower` and `upper`.
///
/// Either bound may be `None` for an open end. This is the primitive the
/// rest of the engine is built on; it never fails for tight-but-valid
/// adjacent keys (it extends key length to make room).
pub fn key_between(
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<SmolStr, SortKeyError> {
    if let Some(a) = lower {
        validate_key(a)?;
    }
    if let Some(b) = upper {
        validate_key(b)?;
    }
    if let (Some(a), Some(b)) = (lower, upper) {
        if a >= b {
            return Err(SortKeyError::OutOfOrder(a.into(), b.into()));
        }
    }

    match (lower, upper) {
        (None, None) => Ok(SmolStr::new_static("a0")),

        (None, Some(b)) => {
            let int_b = integer_part(b)?;
            let frac_b = &b.as_bytes()[int_b.len()..];
            if int_b == SMALLEST_INTEGER {
                if frac_b.is_empty() {
                    // b is the absolute smallest key; nothing fits below it.
                    return Err(SortKeyError::Exhausted);
                }
                return Ok(concat(int_b, &midpoint(&[], Some(frac_b))));
            }
            if int_b < b {
                // b carries a fraction; its bare integer part sorts below it.
                return Ok(int_b.into());
            }
            decrement_integer(int_b)?.ok_or(SortKeyError::Exhausted)
        }

        (Some(a), None) => {
            let int_a = integer_part(a)?;
            let frac_a = &a.as_bytes()[int_a.len()..];
            match increment_integer(int_a)? {
                Some(next) => Ok(next),
                None => Ok(concat(int_a, &midpoint(frac_a, None))),
            }
        }

        (Some(a), Some(b)) => {
            let int_a = integer_part(a)?;
            let frac_a = &a.as_bytes()[int_a.len()..];
            let int_b = integer_part(b)?;
            let frac_b = &b.as_bytes()[int_b.len()..];
            if int_a == int_b {
                return Ok(concat(int_a, &midpoint(frac_a, Some(frac_b))));
            }
            if let Some(next) = increment_integer(int_a)? {
                if next.as_str() < b {
                    return Ok(next);
                }
            }
            Ok(concat(int_a, &midpoint(frac_a, None)))
        }
    }
}

/// Whether `key` is well-formed: digit alphabet only, a head that encodes a
/// plausible integer length, and no trailing-zero fraction.
pub fn is_valid_key(key: &str) -> bool {
    validate_key(key).is_ok()
}

/// Stable ascending sort by sort key. Ties (which only exist when keys are
/// degenerate) keep the original array order, so the result is deterministic.
pub fn sorted_cards(cards: &[Card]) -> Vec<Card> {
    let mut out = cards.to_vec();
    out.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    out
}

/// Indices of `cards` in ascending sort-key order (stable on ties).
pub(crate) fn sorted_indices(cards: &[Card]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..cards.len()).collect();
    idx.sort_by(|&a, &b| cards[a].sort_key.cmp(&cards[b].sort_key));
    idx
}

/// Key strictly greater than every existing key (`"a0"` when empty).
pub fn append_key(cards: &[Card]) -> Result<SmolStr, SortKeyError> {
    let max = cards.iter().map(|c| c.sort_key.as_str()).max();
    key_between(max, None)
}

/// Key that lands at `index` in the sorted sequence (index clamped to
/// `0..=len`). Used for "insert after" semantics such as duplication.
pub fn insert_key(cards: &[Card], index: usize) -> Result<SmolStr, SortKeyError> {
    let order = sorted_indices(cards);
    let index = index.min(order.len());
    let lower = index
        .checked_sub(1)
        .map(|i| cards[order[i]].sort_key.as_str());
    let upper = order.get(index).map(|&i| cards[i].sort_key.as_str());
    key_between(lower, upper)
}

/// Key the moved card should adopt to land at `target_index` in the
/// post-move sorted sequence. Neighbors are computed over the order with the
/// moved card excluded, so the key is never generated "between the card and
/// itself"; `target_index` is clamped against the remaining length.
pub fn move_key(
    cards: &[Card],
    moved_id: &str,
    target_index: usize,
) -> Result<SmolStr, SortKeyError> {
    if !cards.iter().any(|c| c.id == moved_id) {
        return Err(SortKeyError::UnknownCard(moved_id.into()));
    }
    let order: Vec<usize> = sorted_indices(cards)
        .into_iter()
        .filter(|&i| cards[i].id != moved_id)
        .collect();
    let target = target_index.min(order.len());
    let lower = target
        .checked_sub(1)
        .map(|i| cards[order[i]].sort_key.as_str());
    let upper = order.get(target).map(|&i| cards[i].sort_key.as_str());
    key_between(lower, upper)
}

/// True when two or more cards share a sort key.
pub fn has_duplicate_keys(cards: &[Card]) -> bool {
    let mut keys: Vec<&str> = cards.iter().map(|c| c.sort_key.as_str()).collect();
    keys.sort_unstable();
    keys.windows(2).any(|w| w[0] == w[1])
}

/// Fresh, evenly spaced key assignment preserving the current stable-sorted
/// order. Returns `(id, new_key)` pairs for every card.
pub fn normalize_keys(cards: &[Card]) -> Vec<(CardId, SmolStr)> {
    let order = sorted_indices(cards);
    let mut out = Vec::with_capacity(order.len());
    let mut prev: Option<SmolStr> = None;
    for i in order {
        // Walking the append chain yields consecutive integer keys, which is
        // as evenly spaced as the key space gets.
        let key = match key_between(prev.as_deref(), None) {
            Ok(k) => k,
            Err(err) => {
                // Unreachable with engine-generated keys; keep the repair
                // total anyway.
                tracing::warn!(%err, "normalize fell back to restarting the key chain");
                SmolStr::new_static("a0")
            }
        };
        prev = Some(key.clone());
        out.push((cards[i].id.clone(), key));
    }
    out
}
