//! Index-into relations and the "no relation" sentinel.
//!
//! On disk an index-valued element is a signed integer where `-1` means "no
//! target". In memory it is decoded to `Option<u32>` so that rebasing only
//! ever touches real targets.

/// Raw value stored for "no relation".
pub const NO_RELATION: i64 = -1;

/// Decode a raw index value. Any negative value has no target.
#[inline]
pub fn relation(raw: i64) -> Option<u32> {
    u32::try_from(raw).ok()
}

/// Encode a relation back to its raw value.
#[inline]
pub fn encode_relation(rel: Option<u32>) -> i64 {
    rel.map_or(NO_RELATION, i64::from)
}

/// Shift every real target by `base`. Negative raw values are kept as they
/// are, so the sentinel survives any number of merges and out-of-range
/// negatives stay visible to validation.
pub fn rebase(values: &[i64], base: usize) -> Vec<i64> {
    values
        .iter()
        .map(|&raw| match relation(raw) {
            Some(target) => target as i64 + base as i64,
            None => raw,
        })
        .collect()
}

/// Exclusive prefix sum: `[3, 2, 4]` becomes `[0, 3, 5]`.
pub fn counts_to_offsets(counts: &[usize]) -> Vec<i64> {
    let mut total = 0i64;
    counts
        .iter()
        .map(|&c| {
            let offset = total;
            total += c as i64;
            offset
        })
        .collect()
}

/// Element count of each entry of an offset table, `total - last` for the
/// final entry.
pub fn offsets_to_counts(offsets: &[i64], total: usize) -> Vec<i64> {
    let total = total as i64;
    (0..offsets.len())
        .map(|i| {
            let end = offsets.get(i + 1).copied().unwrap_or(total);
            end - offsets[i]
        })
        .collect()
}
