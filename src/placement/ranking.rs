use std::cmp::Ordering;

use crate::ir::BranchCandidate;

/// Hard ceiling on emitted suggestions regardless of caller configuration.
pub(crate) const MAX_SUGGESTION_CAP: i64 = 6;

const ICON_ASSET_TYPE: &str = "icon";

/// A branch candidate that survived filtering, with every field normalized.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankedCandidate {
    pub branch_id: String,
    pub asset_type: String,
    pub asset_key: String,
    pub asset_src: Option<String>,
    pub confidence: Option<f32>,
    pub evidence_image_ids: Vec<String>,
}

impl RankedCandidate {
    /// Comparison rank: missing confidence sorts below any known value.
    fn rank_value(&self) -> f32 {
        self.confidence.unwrap_or(-1.0)
    }
}

/// Filters raw branches to valid icon entries, normalizes them, sorts by
/// confidence descending with stable index tie-break, and truncates to the
/// clamped maximum. A resolved maximum of 0 short-circuits the whole
/// placement pass.
pub(crate) fn select_ranked_candidates(
    branches: &[BranchCandidate],
    max_suggestions: i64,
) -> Vec<RankedCandidate> {
    let cap = max_suggestions.clamp(0, MAX_SUGGESTION_CAP) as usize;
    if cap == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<RankedCandidate> = Vec::new();
    for (index, branch) in branches.iter().enumerate() {
        let asset_type = branch.asset_type.as_deref().unwrap_or(ICON_ASSET_TYPE);
        if asset_type != ICON_ASSET_TYPE {
            continue;
        }
        let asset_key = branch.asset_key.trim();
        if asset_key.is_empty() {
            continue;
        }
        let branch_id = branch.branch_id.trim();
        let branch_id = if branch_id.is_empty() {
            format!("branch-{index}")
        } else {
            branch_id.to_string()
        };
        ranked.push(RankedCandidate {
            branch_id,
            asset_type: ICON_ASSET_TYPE.to_string(),
            asset_key: asset_key.to_string(),
            asset_src: branch.asset_src.clone(),
            confidence: branch
                .confidence
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0)),
            evidence_image_ids: branch
                .evidence_image_ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }

    // Stable sort: ties keep original input order.
    ranked.sort_by(|a, b| {
        b.rank_value()
            .partial_cmp(&a.rank_value())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(cap);
    ranked
}
