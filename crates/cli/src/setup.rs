use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "libris",
    bin_name = "libris",
    version,
    disable_help_subcommand = true,
    after_help = "Run `libris shell` to keep one session open across commands."
)]
#[command(about = "Command-line client for the libris library catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub base_url: Option<String>,

    /// Session file (overrides session.store_path)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub store: Option<PathBuf>,

    /// Debug logging for libris crates
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// One line typed at the shell prompt.
#[derive(Parser, Debug)]
#[command(name = "libris", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the access token
    #[command(display_order = 1)]
    Login {
        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    #[command(display_order = 2)]
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        /// Prompted for when omitted
        #[arg(long)]
        password_confirmation: Option<String>,
    },

    /// Forget the stored access token
    #[command(display_order = 3)]
    Logout,

    /// Show who is signed in
    #[command(display_order = 4)]
    Whoami,

    /// Browse and edit the catalog
    #[command(subcommand, display_order = 10)]
    Books(BooksCommand),

    /// Show the profile card and the member directory
    #[command(display_order = 20)]
    Profile {
        /// Filter the directory by name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Manage friends from the directory
    #[command(subcommand, display_order = 21)]
    Friends(FriendsCommand),

    /// Interactive session
    #[command(display_order = 30)]
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum BooksCommand {
    /// List books, five per page
    #[command(alias = "ls")]
    List {
        /// Title prefix, case-insensitive
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Add a book
    Add {
        #[command(flatten)]
        fields: BookFields,
    },

    /// Change a listed book
    Edit {
        id: u64,

        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        id: u64,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct BookFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub publisher: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FriendsCommand {
    /// Add a directory entry as a friend
    Add { id: u64 },
}
