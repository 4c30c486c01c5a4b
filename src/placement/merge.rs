use std::collections::HashMap;

use super::Suggestion;

/// Reconciles a freshly computed suggestion list against the previous one.
/// Identity is the suggestion `id`; persisting ids keep their original
/// `created_at_ms`, new ids are stamped with `now_ms`, and every emitted item
/// gets `updated_at_ms = now_ms`. Items absent from `next` drop out; no
/// tombstoning.
pub fn merge_ambient_suggestions(
    previous: &[Suggestion],
    next: &[Suggestion],
    now_ms: u64,
) -> Vec<Suggestion> {
    let created_by_id: HashMap<&str, u64> = previous
        .iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| (item.id.as_str(), item.created_at_ms))
        .collect();

    next.iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| {
            let mut merged = item.clone();
            merged.created_at_ms = created_by_id
                .get(item.id.as_str())
                .copied()
                .unwrap_or(now_ms);
            merged.updated_at_ms = now_ms;
            merged
        })
        .collect()
}
