//! Blog/post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five data-access operations the menu workflows need.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every write auto-commits; there is no multi-statement transaction.
//! - `add_post` never writes a post whose blog does not exist.
//! - Listing order is fully deterministic (ties broken by id).

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::blog::{Blog, BlogId};
use crate::model::post::{NewPost, Post, PostId, PostWithBlog};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blog/post persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Post insert referenced a blog id with no stored blog.
    BlogNotFound(BlogId),
    /// Connection was not bootstrapped through `db::open_*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::BlogNotFound(id) => write!(f, "blog not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Narrow data-access contract used by the menu workflows.
///
/// Implementations decide the storage technology; workflows only see these
/// five operations.
pub trait BlogRepository {
    /// Inserts a blog and returns its assigned id.
    fn add_blog(&self, name: &str) -> RepoResult<BlogId>;
    /// Inserts a post and returns its assigned id.
    ///
    /// Fails with [`RepoError::BlogNotFound`] when `post.blog_id` is unknown.
    fn add_post(&self, post: &NewPost) -> RepoResult<PostId>;
    /// All blogs ordered by name ascending.
    fn list_blogs(&self) -> RepoResult<Vec<Blog>>;
    /// Posts of one blog ordered by title ascending.
    fn list_posts_for_blog(&self, blog_id: BlogId) -> RepoResult<Vec<Post>>;
    /// Every post with its blog name, ordered by blog name then title.
    fn list_all_posts_with_blog_names(&self) -> RepoResult<Vec<PostWithBlog>>;
}

impl<R: BlogRepository + ?Sized> BlogRepository for &R {
    fn add_blog(&self, name: &str) -> RepoResult<BlogId> {
        (**self).add_blog(name)
    }

    fn add_post(&self, post: &NewPost) -> RepoResult<PostId> {
        (**self).add_post(post)
    }

    fn list_blogs(&self) -> RepoResult<Vec<Blog>> {
        (**self).list_blogs()
    }

    fn list_posts_for_blog(&self, blog_id: BlogId) -> RepoResult<Vec<Post>> {
        (**self).list_posts_for_blog(blog_id)
    }

    fn list_all_posts_with_blog_names(&self) -> RepoResult<Vec<PostWithBlog>> {
        (**self).list_all_posts_with_blog_names()
    }
}

/// SQLite-backed blog/post repository.
pub struct SqliteBlogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlogRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that did not go through `db::open_*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BlogRepository for SqliteBlogRepository<'_> {
    fn add_blog(&self, name: &str) -> RepoResult<BlogId> {
        self.conn
            .execute("INSERT INTO blogs (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn add_post(&self, post: &NewPost) -> RepoResult<PostId> {
        if !blog_exists(self.conn, post.blog_id)? {
            return Err(RepoError::BlogNotFound(post.blog_id));
        }

        self.conn.execute(
            "INSERT INTO posts (title, content, blog_id) VALUES (?1, ?2, ?3);",
            params![post.title.as_str(), post.content.as_str(), post.blog_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_blogs(&self) -> RepoResult<Vec<Blog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM blogs
             ORDER BY name ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut blogs = Vec::new();
        while let Some(row) = rows.next()? {
            blogs.push(Blog {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(blogs)
    }

    fn list_posts_for_blog(&self, blog_id: BlogId) -> RepoResult<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, blog_id
             FROM posts
             WHERE blog_id = ?1
             ORDER BY title ASC, id ASC;",
        )?;
        let mut rows = stmt.query([blog_id])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn list_all_posts_with_blog_names(&self) -> RepoResult<Vec<PostWithBlog>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id AS post_id,
                b.id AS blog_id,
                b.name AS blog_name,
                p.title AS title,
                p.content AS content
             FROM posts p
             INNER JOIN blogs b ON b.id = p.blog_id
             ORDER BY b.name ASC, p.title ASC, p.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(PostWithBlog {
                post_id: row.get("post_id")?,
                blog_id: row.get("blog_id")?,
                blog_name: row.get("blog_name")?,
                title: row.get("title")?,
                content: row.get("content")?,
            });
        }
        Ok(posts)
    }
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        blog_id: row.get("blog_id")?,
    })
}

fn blog_exists(conn: &Connection, blog_id: BlogId) -> RepoResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM blogs WHERE id = ?1;", [blog_id], |row| {
            row.get::<_, i64>(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["blogs", "posts"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
