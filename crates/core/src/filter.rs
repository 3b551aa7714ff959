//! Anchor-only filtering.
//!
//! Keeps posts that start or directly answer an anchor post. Sequence numbers
//! are never touched, so gaps in the output line up with the source thread.

use tracing::debug;

use crate::extract::Post;

/// Keeps anchor posts and their immediate follow-ups when `anchor_only` is set.
///
/// With `anchor_only` unset the input is returned unchanged.
pub fn filter_posts(posts: Vec<Post>, anchor_only: bool) -> Vec<Post> {
    if !anchor_only {
        return posts;
    }

    let before = posts.len();
    let kept: Vec<Post> = posts.into_iter().filter(Post::is_anchor_thread).collect();
    debug!(before, after = kept.len(), "anchor-only filter applied");
    kept
}
