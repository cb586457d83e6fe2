//! ZeroEntropy retrieval service integration.
//!
//! Documents live in a named collection; each synced post is stored at the
//! path `post_<id>` so query results can be mapped back to local posts.

mod api;
mod provider;

pub use api::{RetrievalResult, StatusInfo, ZeroEntropyClient};
pub use provider::RetrievalProvider;

use std::sync::LazyLock;

use regex::Regex;

static POST_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"post_(\d+)").expect("valid regex"));

/// Extract the local post id from a retrieval document path.
///
/// Paths that don't carry the `post_<digits>` marker (or whose digits
/// overflow `i64`) yield `None` and are skipped by callers.
pub fn extract_post_id(path: &str) -> Option<i64> {
    POST_PATH_RE
        .captures(path)
        .and_then(|caps| caps[1].parse().ok())
}

/// Document path for a local post, the inverse of [`extract_post_id`].
pub fn post_path(id: i64) -> String {
    format!("post_{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_post_path() {
        assert_eq!(extract_post_id("post_42"), Some(42));
        assert_eq!(extract_post_id("post_784"), Some(784));
    }

    #[test]
    fn extracts_id_when_marker_is_embedded() {
        assert_eq!(extract_post_id("site/post_7.txt"), Some(7));
    }

    #[test]
    fn non_post_paths_are_skipped() {
        assert_eq!(extract_post_id("other_42"), None);
        assert_eq!(extract_post_id("page_3"), None);
        assert_eq!(extract_post_id(""), None);
    }

    #[test]
    fn post_path_round_trips() {
        assert_eq!(extract_post_id(&post_path(19)), Some(19));
    }
}
