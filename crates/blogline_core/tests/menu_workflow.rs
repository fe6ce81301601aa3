use blogline_core::db::{open_db_in_memory, DbError};
use blogline_core::{
    Blog, BlogId, BlogRepository, Menu, MenuState, NewPost, Post, PostId, PostWithBlog,
    RepoError, RepoResult, SqliteBlogRepository,
};
use std::cell::RefCell;

/// Runs a full session against `repo` with scripted input and returns stdout.
fn run_session<R: BlogRepository>(repo: R, script: &str) -> String {
    let mut output = Vec::new();
    Menu::new(repo, script.as_bytes(), &mut output)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn alpha_beta_scenario_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlogRepository::try_new(&conn).unwrap();

    run_session(&repo, "2\nBeta\n\n2\nAlpha\n\nq\n");
    let blogs = repo.list_blogs().unwrap();
    let names: Vec<&str> = blogs.iter().map(|blog| blog.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Beta"]);
    let alpha_id = blogs[0].id;

    let output = run_session(&repo, &format!("3\n{alpha_id}\nHi\n...\n\nq\n"));
    assert!(output.contains(&format!("ID: {alpha_id}, Name: Alpha")));
    assert!(output.contains("Post created successfully."));

    let posts = repo.list_posts_for_blog(alpha_id).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Hi");
    assert_eq!(posts[0].content, "...");

    let output = run_session(&repo, "4\n2\n\nq\n");
    assert!(output.contains("All posts:\nBlog: Alpha\nTitle: Hi\nContent: ...\n"));
    assert_eq!(output.matches("Blog: ").count(), 1);

    let output = run_session(&repo, &format!("4\n1\n{alpha_id}\n\n1\n\nq\n"));
    assert!(output.contains("Posts from blog 'Alpha':\nTitle: Hi\nContent: ...\n"));
    assert!(output.contains(&format!("{}\n", "-".repeat(40))));
    assert!(output.contains("All blogs in the database:\nAlpha\nBeta\n"));
}

#[test]
fn create_post_with_unlisted_id_never_reaches_data_layer() {
    let repo = RecordingRepo::with_blogs(&["Alpha"]);

    let output = run_session(&repo, "3\n999\n\nq\n");
    assert!(output.contains("Invalid Blog ID."));
    assert!(repo.post_writes().is_empty());
    assert_eq!(repo.calls(), ["list_blogs"]);
}

#[test]
fn create_post_with_non_numeric_id_is_rejected() {
    let repo = RecordingRepo::with_blogs(&["Alpha"]);

    let output = run_session(&repo, "3\nabc\n\nq\n");
    assert!(output.contains("Invalid Blog ID."));
    assert!(repo.post_writes().is_empty());
}

#[test]
fn create_post_with_no_blogs_makes_no_further_calls() {
    let repo = RecordingRepo::default();

    let output = run_session(&repo, "3\n\nq\n");
    assert!(output.contains("No blogs available"));
    assert_eq!(repo.calls(), ["list_blogs"]);
}

#[test]
fn create_post_accepts_padded_numeric_id() {
    let repo = RecordingRepo::with_blogs(&["Alpha"]);

    run_session(&repo, "3\n 1 \nTitle\nBody\n\nq\n");
    assert_eq!(repo.post_writes(), [NewPost::new("Title", "Body", 1)]);
}

#[test]
fn invalid_top_level_selection_returns_to_menu() {
    let repo = RecordingRepo::default();

    let output = run_session(&repo, "7\n\n 1\n\nQ\n");
    assert_eq!(output.matches("Invalid selection. Please try again.").count(), 2);
    assert!(output.ends_with("Exiting...\n"));
    assert!(repo.calls().is_empty());
}

#[test]
fn display_posts_reports_invalid_sub_choices_and_ids() {
    let repo = RecordingRepo::with_blogs(&["Alpha"]);

    let output = run_session(&repo, "4\n3\n\n4\n1\nxyz\n\n4\n1\n42\n\n4\n1\n1\n\nq\n");
    assert!(output.contains("Invalid selection. Returning to menu."));
    assert!(output.contains("Invalid input. Please enter a valid Blog ID."));
    assert!(output.contains("Invalid Blog ID."));
    assert!(output.contains("No posts found for this blog."));
    assert_eq!(
        repo.calls(),
        ["list_blogs", "list_blogs", "list_blogs", "list_posts_for_blog"]
    );
}

#[test]
fn display_all_posts_on_empty_store() {
    let repo = RecordingRepo::default();

    let output = run_session(&repo, "4\n2\n\nq\n");
    assert!(output.contains("No posts available."));
}

#[test]
fn storage_errors_are_reported_and_menu_continues() {
    let output = run_session(FailingRepo, "1\n\n2\nAlpha\n\n3\n\n4\n2\n\nq\n");

    assert_eq!(
        output
            .matches("An error occurred; see the log for details.")
            .count(),
        4
    );
    assert!(output.ends_with("Exiting...\n"));
}

#[test]
fn end_of_input_ends_session_cleanly() {
    let repo = RecordingRepo::default();

    run_session(&repo, "");
    run_session(&repo, "2\n");
    run_session(&repo, "1\n");
    assert_eq!(repo.calls(), ["list_blogs"]);
    assert!(repo.blog_writes().is_empty());
}

#[test]
fn dispatch_walks_explicit_states() {
    let repo = RecordingRepo::default();
    let mut output = Vec::new();
    let mut menu = Menu::new(&repo, "2\nAlpha\n\n".as_bytes(), &mut output);

    assert_eq!(menu.dispatch(MenuState::Idle).unwrap(), MenuState::AddBlog);
    assert_eq!(menu.dispatch(MenuState::AddBlog).unwrap(), MenuState::Idle);
    assert_eq!(menu.dispatch(MenuState::Exit).unwrap(), MenuState::Exit);
    assert_eq!(repo.blog_writes(), ["Alpha"]);

    let (_, _, output) = menu.into_parts();
    let output = String::from_utf8(output.clone()).unwrap();
    assert!(output.contains("Enter a name for a new Blog: Blog added.\n"));
}

/// In-memory repository that records every call it receives.
#[derive(Default)]
struct RecordingRepo {
    blogs: RefCell<Vec<Blog>>,
    posts: RefCell<Vec<Post>>,
    calls: RefCell<Vec<&'static str>>,
    blog_writes: RefCell<Vec<String>>,
    post_writes: RefCell<Vec<NewPost>>,
}

impl RecordingRepo {
    fn with_blogs(names: &[&str]) -> Self {
        let repo = Self::default();
        for (index, name) in names.iter().enumerate() {
            repo.blogs.borrow_mut().push(Blog {
                id: index as BlogId + 1,
                name: name.to_string(),
            });
        }
        repo
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn blog_writes(&self) -> Vec<String> {
        self.blog_writes.borrow().clone()
    }

    fn post_writes(&self) -> Vec<NewPost> {
        self.post_writes.borrow().clone()
    }
}

impl BlogRepository for RecordingRepo {
    fn add_blog(&self, name: &str) -> RepoResult<BlogId> {
        self.calls.borrow_mut().push("add_blog");
        self.blog_writes.borrow_mut().push(name.to_string());
        let id = self.blogs.borrow().len() as BlogId + 1;
        self.blogs.borrow_mut().push(Blog {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    fn add_post(&self, post: &NewPost) -> RepoResult<PostId> {
        self.calls.borrow_mut().push("add_post");
        self.post_writes.borrow_mut().push(post.clone());
        let id = self.posts.borrow().len() as PostId + 1;
        self.posts.borrow_mut().push(Post {
            id,
            title: post.title.clone(),
            content: post.content.clone(),
            blog_id: post.blog_id,
        });
        Ok(id)
    }

    fn list_blogs(&self) -> RepoResult<Vec<Blog>> {
        self.calls.borrow_mut().push("list_blogs");
        let mut blogs = self.blogs.borrow().clone();
        blogs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(blogs)
    }

    fn list_posts_for_blog(&self, blog_id: BlogId) -> RepoResult<Vec<Post>> {
        self.calls.borrow_mut().push("list_posts_for_blog");
        Ok(self
            .posts
            .borrow()
            .iter()
            .filter(|post| post.blog_id == blog_id)
            .cloned()
            .collect())
    }

    fn list_all_posts_with_blog_names(&self) -> RepoResult<Vec<PostWithBlog>> {
        self.calls.borrow_mut().push("list_all_posts_with_blog_names");
        Ok(Vec::new())
    }
}

/// Repository whose every operation fails like a lost connection.
struct FailingRepo;

fn connection_lost<T>() -> RepoResult<T> {
    Err(RepoError::Db(DbError::Sqlite(
        rusqlite::Error::QueryReturnedNoRows,
    )))
}

impl BlogRepository for FailingRepo {
    fn add_blog(&self, _name: &str) -> RepoResult<BlogId> {
        connection_lost()
    }

    fn add_post(&self, _post: &NewPost) -> RepoResult<PostId> {
        connection_lost()
    }

    fn list_blogs(&self) -> RepoResult<Vec<Blog>> {
        connection_lost()
    }

    fn list_posts_for_blog(&self, _blog_id: BlogId) -> RepoResult<Vec<Post>> {
        connection_lost()
    }

    fn list_all_posts_with_blog_names(&self) -> RepoResult<Vec<PostWithBlog>> {
        connection_lost()
    }
}
