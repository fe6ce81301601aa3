//! Blog/post workflows run by the menu controller.
//!
//! Each workflow performs at most two dependent repository calls. Blog ids
//! typed by the user are checked against the blogs just listed, so an
//! unknown id never reaches the repository.

use super::{Menu, WorkflowError, WorkflowResult};
use crate::model::blog::{Blog, BlogId};
use crate::model::post::NewPost;
use crate::repo::blog_repo::BlogRepository;
use log::info;
use std::io::{BufRead, Write};

const NO_BLOGS_MESSAGE: &str = "No blogs available. Please add a blog first.";
const INVALID_BLOG_ID_MESSAGE: &str = "Invalid Blog ID.";
const NOT_A_NUMBER_MESSAGE: &str = "Invalid input. Please enter a valid Blog ID.";
const SEPARATOR_WIDTH: usize = 40;

/// Outcome of asking the user to pick one of the listed blogs.
enum BlogSelection {
    Selected(Blog),
    NotANumber,
    Unknown,
}

impl<R, I, O> Menu<R, I, O>
where
    R: BlogRepository,
    I: BufRead,
    O: Write,
{
    pub(super) fn list_blogs(&mut self) -> WorkflowResult<()> {
        let blogs = self.repo.list_blogs()?;
        self.console.line("All blogs in the database:")?;
        for blog in &blogs {
            self.console.line(&blog.name)?;
        }
        info!(
            "event=workflow module=menu status=ok workflow=list_blogs count={}",
            blogs.len()
        );
        Ok(())
    }

    pub(super) fn add_blog(&mut self) -> WorkflowResult<()> {
        let name = self.ask("Enter a name for a new Blog: ")?;
        let blog_id = self.repo.add_blog(&name)?;
        self.console.line("Blog added.")?;
        info!("event=workflow module=menu status=ok workflow=add_blog blog_id={blog_id}");
        Ok(())
    }

    pub(super) fn create_post(&mut self) -> WorkflowResult<()> {
        let blogs = self.repo.list_blogs()?;
        if blogs.is_empty() {
            self.console.line(NO_BLOGS_MESSAGE)?;
            return Ok(());
        }

        self.console.line("Select a blog to post to:")?;
        let blog = match self.choose_blog(blogs)? {
            BlogSelection::Selected(blog) => blog,
            BlogSelection::NotANumber | BlogSelection::Unknown => {
                self.console.line(INVALID_BLOG_ID_MESSAGE)?;
                info!(
                    "event=workflow module=menu status=rejected workflow=create_post reason=invalid_blog_id"
                );
                return Ok(());
            }
        };

        let title = self.ask("Enter the title of the post: ")?;
        let content = self.ask("Enter the content of the post: ")?;
        let post_id = self.repo.add_post(&NewPost::new(title, content, blog.id))?;
        self.console.line("Post created successfully.")?;
        info!(
            "event=workflow module=menu status=ok workflow=create_post post_id={post_id} blog_id={}",
            blog.id
        );
        Ok(())
    }

    pub(super) fn display_posts(&mut self) -> WorkflowResult<()> {
        self.console.line("Would you like to:")?;
        self.console.line("1) View posts from a specific blog")?;
        self.console.line("2) View all posts")?;

        match self.ask("")?.as_str() {
            "1" => self.display_posts_for_blog(),
            "2" => self.display_all_posts(),
            _ => {
                self.console.line("Invalid selection. Returning to menu.")?;
                Ok(())
            }
        }
    }

    fn display_posts_for_blog(&mut self) -> WorkflowResult<()> {
        let blogs = self.repo.list_blogs()?;
        if blogs.is_empty() {
            self.console.line(NO_BLOGS_MESSAGE)?;
            return Ok(());
        }

        self.console.line("Select a blog to view posts from:")?;
        let blog = match self.choose_blog(blogs)? {
            BlogSelection::Selected(blog) => blog,
            BlogSelection::NotANumber => {
                self.console.line(NOT_A_NUMBER_MESSAGE)?;
                return Ok(());
            }
            BlogSelection::Unknown => {
                self.console.line(INVALID_BLOG_ID_MESSAGE)?;
                return Ok(());
            }
        };

        let posts = self.repo.list_posts_for_blog(blog.id)?;
        if posts.is_empty() {
            self.console.line("No posts found for this blog.")?;
        } else {
            self.console
                .line(format_args!("Posts from blog '{}':", blog.name))?;
            for post in &posts {
                self.console.line(format_args!("Title: {}", post.title))?;
                self.console
                    .line(format_args!("Content: {}", post.content))?;
                self.separator()?;
            }
        }
        info!(
            "event=workflow module=menu status=ok workflow=display_posts scope=blog blog_id={} count={}",
            blog.id,
            posts.len()
        );
        Ok(())
    }

    fn display_all_posts(&mut self) -> WorkflowResult<()> {
        let rows = self.repo.list_all_posts_with_blog_names()?;
        if rows.is_empty() {
            self.console.line("No posts available.")?;
        } else {
            self.console.line("All posts:")?;
            for row in &rows {
                self.console.line(format_args!("Blog: {}", row.blog_name))?;
                self.console.line(format_args!("Title: {}", row.title))?;
                self.console.line(format_args!("Content: {}", row.content))?;
                self.separator()?;
            }
        }
        info!(
            "event=workflow module=menu status=ok workflow=display_posts scope=all count={}",
            rows.len()
        );
        Ok(())
    }

    /// Prints the listed blogs with ids and reads the user's pick.
    fn choose_blog(&mut self, blogs: Vec<Blog>) -> WorkflowResult<BlogSelection> {
        for blog in &blogs {
            self.console
                .line(format_args!("ID: {}, Name: {}", blog.id, blog.name))?;
        }

        let answer = self.ask("Enter the Blog ID: ")?;
        let Ok(blog_id) = answer.trim().parse::<BlogId>() else {
            return Ok(BlogSelection::NotANumber);
        };

        Ok(blogs
            .into_iter()
            .find(|blog| blog.id == blog_id)
            .map_or(BlogSelection::Unknown, BlogSelection::Selected))
    }

    fn ask(&mut self, prompt: &str) -> WorkflowResult<String> {
        self.console
            .prompt(prompt)?
            .ok_or(WorkflowError::EndOfInput)
    }

    fn separator(&mut self) -> WorkflowResult<()> {
        self.console.line("-".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }
}
