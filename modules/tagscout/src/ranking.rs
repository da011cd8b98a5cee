use std::cmp::Ordering;

use tagscout_common::HashtagRecord;

/// Order hashtags by normalized post count, largest first. Ties keep their
/// input order.
pub fn sort_by_count(records: &mut [HashtagRecord]) {
    records.sort_by(|a, b| {
        b.post_count
            .partial_cmp(&a.post_count)
            .unwrap_or(Ordering::Equal)
    });
}

/// The `n` hashtags with the largest post counts, descending.
pub fn rank_top(records: &[HashtagRecord], n: usize) -> Vec<HashtagRecord> {
    let mut ranked = records.to_vec();
    sort_by_count(&mut ranked);
    ranked.truncate(n);
    ranked
}
