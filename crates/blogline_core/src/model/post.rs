//! Post records and the joined post/blog read model.

use crate::model::blog::BlogId;

/// Storage-assigned post identifier.
pub type PostId = i64;

/// Persisted post belonging to exactly one blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub blog_id: BlogId,
}

/// Insert request for a post; the id is assigned on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub blog_id: BlogId,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, blog_id: BlogId) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            blog_id,
        }
    }
}

/// Post row joined with the name of its owning blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithBlog {
    pub post_id: PostId,
    pub blog_id: BlogId,
    pub blog_name: String,
    pub title: String,
    pub content: String,
}
