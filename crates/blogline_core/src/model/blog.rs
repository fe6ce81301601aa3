//! Blog record.

/// Storage-assigned blog identifier.
pub type BlogId = i64;

/// Named container owning zero or more posts.
///
/// Names are free text: not trimmed, not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: BlogId,
    pub name: String,
}
