//! Command-line surface for `school-blog`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use school_blog::config::SettingsOverrides;
use school_blog_api_types::Category;

#[derive(Parser, Debug)]
#[command(
    name = "school-blog",
    version,
    about = "Browse, search and publish on the school blog",
    long_about = None
)]
pub struct Cli {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SCHOOL_BLOG_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the post categories
    Categories,
    /// Read and write posts
    Posts(PostsArgs),
    /// Search posts
    Search(SearchArgs),
    /// Login, signup and session management
    Auth(AuthArgs),
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// Show the home feed, optionally filtered by category
    List {
        #[arg(long)]
        category: Option<Category>,
        /// Number of "show more" steps to apply
        #[arg(long, default_value_t = 0)]
        reveal: u32,
    },
    /// Get a post by id
    Get { id: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: Category,
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Cover image file to upload
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Replace the editable fields of a post
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: Category,
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Cover reference already known to the service
        #[arg(long)]
        cover: Option<String>,
    },
    /// Delete a post
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub action: SearchCmd,
}

#[derive(Subcommand, Debug)]
pub enum SearchCmd {
    /// Run one search and print the results
    Query {
        term: String,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Treat each stdin line as the latest search box value
    ///
    /// `:category NAME` switches the filter, a bare `:category` clears it.
    Watch {
        #[arg(long)]
        category: Option<Category>,
    },
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Log in and store the session
    Login(CredentialArgs),
    /// Create an account and store the session
    Signup(CredentialArgs),
    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
}

#[derive(Parser, Debug)]
pub struct CredentialArgs {
    #[arg(long)]
    pub username: String,

    /// Path to a file containing the password (takes precedence over env)
    #[arg(long, env = "SCHOOL_BLOG_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "SCHOOL_BLOG_PASSWORD")]
    pub password_env: Option<String>,
}
