//! Likes and comments, and the post counters they keep in step.

pub mod comments;
pub mod handlers;
pub mod likes;
