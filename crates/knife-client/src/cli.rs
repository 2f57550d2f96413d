//! Command-line surface of the `knife` binary.

use clap::{Parser, Subcommand, ValueEnum};

use knife_shared::{NoteId, PublicRange};

use crate::commands::{self, drafts::FormEdits, Rendered};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "knife", about = "Read, write and manage notes on a knife instance", version)]
pub struct Cli {
    /// Base URL of the instance (overrides KNIFE_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Session token sent as the auth cookie (overrides KNIFE_AUTH_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Run against a sample in-process instance instead of a server
    #[arg(long, global = true)]
    pub offline: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// The timeline and actions on its notes
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },
    /// Bookmarked notes
    Bookmark {
        #[command(subcommand)]
        action: BookmarkCommand,
    },
    /// The compose form and its draft
    Draft {
        #[command(subcommand)]
        action: DraftCommand,
    },
    /// Category index and category feeds
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Profile card and settings
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Login state
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Show the timeline
    List,
    /// Show a single note
    Show { id: NoteId },
    /// Delete a note after confirmation
    Delete {
        id: NoteId,
        /// Act from the single-note page instead of the timeline
        #[arg(long)]
        page: bool,
    },
    /// Bookmark a note
    Bookmark { id: NoteId },
    /// Change who can see a note (0-3 or private, followers-only, unlisted, public)
    Visibility { id: NoteId, range: PublicRange },
}

#[derive(Subcommand)]
pub enum BookmarkCommand {
    /// Show bookmarked notes
    List,
    /// Remove a bookmark after confirmation
    Remove { id: NoteId },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FormArgs {
    #[arg(long)]
    pub content: Option<String>,
    /// Content warning
    #[arg(long)]
    pub cw: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Visibility (0-3 or its name)
    #[arg(long)]
    pub range: Option<PublicRange>,
}

impl From<FormArgs> for FormEdits {
    fn from(args: FormArgs) -> Self {
        Self {
            content: args.content,
            cw: args.cw,
            category: args.category,
            public_range: args.range,
        }
    }
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Show the form prefilled from the newest draft
    Show,
    /// Save the form as a draft
    Save(FormArgs),
    /// Post the form as a note and discard the draft
    Publish(FormArgs),
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List categories
    List,
    /// Show the notes of one category
    Show { name: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the profile card and recent notes
    Show,
    /// Update display name and/or bio
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show whether the session is logged in
    Status,
    /// Log in and print the session token
    Login {
        #[arg(long)]
        password: String,
    },
    Logout,
}

/// Run one command against `state`.
pub async fn execute(state: &AppState, command: Command) -> Rendered {
    match command {
        Command::Note { action } => match action {
            NoteCommand::List => commands::notes::timeline(state).await,
            NoteCommand::Show { id } => commands::pages::show_note(state, id).await,
            NoteCommand::Delete { id, page: true } => commands::pages::delete_note(state, id).await,
            NoteCommand::Delete { id, page: false } => commands::notes::delete(state, id).await,
            NoteCommand::Bookmark { id } => commands::notes::bookmark(state, id).await,
            NoteCommand::Visibility { id, range } => {
                commands::notes::set_visibility(state, id, range).await
            }
        },
        Command::Bookmark { action } => match action {
            BookmarkCommand::List => commands::bookmarks::list(state).await,
            BookmarkCommand::Remove { id } => commands::bookmarks::remove(state, id).await,
        },
        Command::Draft { action } => match action {
            DraftCommand::Show => commands::drafts::show(state).await,
            DraftCommand::Save(args) => commands::drafts::save(state, args.into()).await,
            DraftCommand::Publish(args) => commands::drafts::publish(state, args.into()).await,
        },
        Command::Category { action } => match action {
            CategoryCommand::List => commands::pages::categories(state).await,
            CategoryCommand::Show { name } => commands::pages::category(state, &name).await,
        },
        Command::Profile { action } => match action {
            ProfileCommand::Show => commands::profile::show(state).await,
            ProfileCommand::Set { name, bio } => commands::profile::update(state, name, bio).await,
        },
        Command::Session { action } => match action {
            SessionCommand::Status => commands::session::status(state).await,
            SessionCommand::Login { password } => commands::session::login(state, &password).await,
            SessionCommand::Logout => commands::session::logout(state).await,
        },
    }
}
