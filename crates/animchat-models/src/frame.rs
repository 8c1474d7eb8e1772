//! Per-frame render outcomes.

use serde::{Deserialize, Serialize};

/// Result of rendering one frame prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// The backend returned a video URL
    Rendered { index: usize, url: String },
    /// The call failed or returned no URL
    Failed { index: usize, reason: String },
}

impl FrameOutcome {
    pub fn rendered(index: usize, url: impl Into<String>) -> Self {
        Self::Rendered {
            index,
            url: url.into(),
        }
    }

    pub fn failed(index: usize, reason: impl Into<String>) -> Self {
        Self::Failed {
            index,
            reason: reason.into(),
        }
    }

    /// Zero-based frame position.
    pub fn index(&self) -> usize {
        match self {
            FrameOutcome::Rendered { index, .. } | FrameOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            FrameOutcome::Rendered { url, .. } => Some(url),
            FrameOutcome::Failed { .. } => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, FrameOutcome::Rendered { .. })
    }
}

/// Aggregate frame outcomes into the links returned to the caller.
///
/// Rendered URLs are kept in frame order; failed frames are dropped without
/// any marker, so the result may be shorter than the input.
pub fn collect_links(outcomes: &[FrameOutcome]) -> Vec<String> {
    let mut ordered: Vec<&FrameOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|o| o.index());
    ordered
        .into_iter()
        .filter_map(|o| o.url().map(str::to_string))
        .collect()
}
