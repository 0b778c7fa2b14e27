use serde::{Deserialize, Serialize};

/// Tunables for the canvas engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Cap on the number of neighbors requested per node expansion.
    pub expansion_limit: usize,
    /// Rows a cluster glyph's reference table shows before truncating to
    /// "showing N of M".
    pub reference_row_limit: usize,
    /// Display labels longer than this are abbreviated with an ellipsis.
    pub max_label_len: usize,
    /// Page size for snippet fetches.
    pub snippet_page_limit: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            expansion_limit: 500,
            reference_row_limit: 10,
            max_label_len: 64,
            snippet_page_limit: 25,
        }
    }
}
