//! Filtering and ordering of per-icon scores

use crate::models::MatchResult;

/// Keep matches under `filter_limit`, best first, at most `slice_limit` of them
///
/// The sort is stable, so icons with equal scores keep their catalog order.
pub fn rank_results(
    mut results: Vec<MatchResult>,
    filter_limit: f64,
    slice_limit: usize,
) -> Vec<MatchResult> {
    results.retain(|result| result.mismatch < filter_limit);
    results.sort_by(|a, b| a.mismatch.total_cmp(&b.mismatch));
    results.truncate(slice_limit);
    results
}
