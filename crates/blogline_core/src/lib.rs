//! Core logic for Blogline: a console menu over blog/post storage.
//! The CLI binary only wires configuration, logging and the console to it.

pub mod config;
pub mod db;
pub mod logging;
pub mod menu;
pub mod model;
pub mod repo;

pub use config::{
    load_connection_file, parse_connection_string, AppConfig, ConfigError, DbTarget,
};
pub use logging::{default_log_level, flush_logging, init_logging, LogSettings};
pub use menu::{Menu, MenuState};
pub use model::blog::{Blog, BlogId};
pub use model::post::{NewPost, Post, PostId, PostWithBlog};
pub use repo::blog_repo::{BlogRepository, RepoError, RepoResult, SqliteBlogRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
