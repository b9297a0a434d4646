/// Ids below this are reserved for manual assignment; the migration counter
/// never hands them out.
pub const ID_OFFSET: u64 = 40;

/// Encodes a counter value as a lowercase base36 id.
pub(crate) fn encode_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.into_iter().rev().collect()
}

/// Decodes an id back to its counter value, if it is a plain base36 number.
/// Ids that are not (arbitrary user-chosen strings) simply don't constrain
/// the counter.
pub(crate) fn decode_base36(s: &str) -> Option<u64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(s, 36).ok()
}
