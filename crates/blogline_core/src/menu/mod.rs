//! Interactive menu controller.
//!
//! # Responsibility
//! - Map top-level selections to blog/post workflows.
//! - Keep user-input errors, storage errors and console errors apart.
//!
//! # Invariants
//! - The current menu position is an explicit [`MenuState`] value; each
//!   [`Menu::dispatch`] call consumes one state and returns the next.
//! - Storage failures never end the session; they are logged and the
//!   controller returns to [`MenuState::Idle`].
//! - Console I/O failures end the session and surface from [`Menu::run`].

pub mod console;
mod workflow;

use self::console::Console;
use crate::repo::blog_repo::{BlogRepository, RepoError};
use log::{error, info};
use std::io::{self, BufRead, Write};

const STORAGE_FAILURE_MESSAGE: &str = "An error occurred; see the log for details.";
const INVALID_SELECTION_MESSAGE: &str = "Invalid selection. Please try again.";
const PAUSE_MESSAGE: &str = "\nPress Enter to return to the menu...";
const MENU_LINES: [&str; 6] = [
    "Enter your selection:",
    "1) Display all blogs",
    "2) Add Blog",
    "3) Create Post",
    "4) Display Posts",
    "Enter q to quit",
];

/// Position of the menu controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Showing the top-level menu and waiting for a selection.
    Idle,
    ListBlogs,
    AddBlog,
    CreatePost,
    DisplayPosts,
    /// Terminal state; [`Menu::run`] returns once reached.
    Exit,
}

impl MenuState {
    /// Maps a raw top-level selection to the workflow it starts.
    ///
    /// Matching is exact: surrounding whitespace makes a selection invalid.
    pub fn from_selection(selection: &str) -> Option<Self> {
        match selection {
            "1" => Some(Self::ListBlogs),
            "2" => Some(Self::AddBlog),
            "3" => Some(Self::CreatePost),
            "4" => Some(Self::DisplayPosts),
            "q" | "Q" => Some(Self::Exit),
            _ => None,
        }
    }

    /// Stable workflow name used in log events.
    pub fn workflow_name(self) -> &'static str {
        match self {
            Self::Idle => "menu",
            Self::ListBlogs => "list_blogs",
            Self::AddBlog => "add_blog",
            Self::CreatePost => "create_post",
            Self::DisplayPosts => "display_posts",
            Self::Exit => "exit",
        }
    }
}

/// Why a workflow stopped before completing normally.
#[derive(Debug)]
pub(crate) enum WorkflowError {
    Storage(RepoError),
    Console(io::Error),
    /// Input ended while the workflow was waiting for an answer.
    EndOfInput,
}

impl From<RepoError> for WorkflowError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<io::Error> for WorkflowError {
    fn from(value: io::Error) -> Self {
        Self::Console(value)
    }
}

pub(crate) type WorkflowResult<T> = Result<T, WorkflowError>;

/// Menu controller over a repository and a console.
pub struct Menu<R, I, O> {
    repo: R,
    console: Console<I, O>,
}

impl<R, I, O> Menu<R, I, O>
where
    R: BlogRepository,
    I: BufRead,
    O: Write,
{
    pub fn new(repo: R, input: I, output: O) -> Self {
        Self {
            repo,
            console: Console::new(input, output),
        }
    }

    /// Runs the loop from [`MenuState::Idle`] until [`MenuState::Exit`].
    ///
    /// Returns early only on console I/O failure.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = MenuState::Idle;
        while state != MenuState::Exit {
            state = self.dispatch(state)?;
        }
        Ok(())
    }

    /// Executes one state and returns the next one.
    pub fn dispatch(&mut self, state: MenuState) -> io::Result<MenuState> {
        match state {
            MenuState::Idle => self.select(),
            MenuState::Exit => Ok(MenuState::Exit),
            workflow => {
                let outcome = match workflow {
                    MenuState::ListBlogs => self.list_blogs(),
                    MenuState::AddBlog => self.add_blog(),
                    MenuState::CreatePost => self.create_post(),
                    _ => self.display_posts(),
                };
                self.finish(workflow, outcome)
            }
        }
    }

    fn select(&mut self) -> io::Result<MenuState> {
        for line in MENU_LINES {
            self.console.line(line)?;
        }

        let Some(selection) = self.console.read_line()? else {
            return Ok(MenuState::Exit);
        };

        match MenuState::from_selection(&selection) {
            Some(MenuState::Exit) => {
                self.console.line("Exiting...")?;
                Ok(MenuState::Exit)
            }
            Some(next) => Ok(next),
            None => {
                self.console.line(INVALID_SELECTION_MESSAGE)?;
                self.pause()
            }
        }
    }

    fn finish(
        &mut self,
        workflow: MenuState,
        outcome: WorkflowResult<()>,
    ) -> io::Result<MenuState> {
        match outcome {
            Ok(()) => {}
            Err(WorkflowError::Storage(err)) => {
                error!(
                    "event=workflow module=menu status=error workflow={} error={}",
                    workflow.workflow_name(),
                    err
                );
                self.console.line(STORAGE_FAILURE_MESSAGE)?;
            }
            Err(WorkflowError::Console(err)) => return Err(err),
            Err(WorkflowError::EndOfInput) => {
                info!(
                    "event=workflow module=menu status=aborted workflow={} reason=end_of_input",
                    workflow.workflow_name()
                );
                return Ok(MenuState::Exit);
            }
        }
        self.pause()
    }

    fn pause(&mut self) -> io::Result<MenuState> {
        self.console.line(PAUSE_MESSAGE)?;
        match self.console.read_line()? {
            Some(_) => Ok(MenuState::Idle),
            None => Ok(MenuState::Exit),
        }
    }

    /// Consumes the controller, returning the repository and console halves.
    pub fn into_parts(self) -> (R, I, O) {
        let (input, output) = self.console.into_inner();
        (self.repo, input, output)
    }
}
