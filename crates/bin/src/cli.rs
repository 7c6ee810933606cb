//! CLI argument definitions for the `shr` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sherry::source::Access;

/// Sherry shared-folder synchronization client
#[derive(Parser, Debug)]
#[command(name = "shr")]
#[command(about = "Sherry: share folders between accounts and keep them in sync")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration folder
    #[arg(short = 'c', long, global = true, env = "SHERRY_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage your authorization
    #[command(subcommand)]
    Auth(AuthCommands),
    /// Manage your folders
    #[command(subcommand)]
    Folder(FolderCommands),
    /// Manage the background sync service
    #[command(subcommand)]
    Service(ServiceCommands),
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Register a new account and log in
    Register(RegisterArgs),
    /// Log in to an existing account
    Login(LoginArgs),
    /// List authorized accounts
    List,
    /// Show or set the default account
    Default(DefaultArgs),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(short, long, default_value = "")]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Password (prompted when omitted)
    #[arg(short, long, default_value = "")]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct DefaultArgs {
    /// Username to set as default; prints the current default when omitted
    pub username: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    /// Create a shared folder from a local directory
    Create(CreateArgs),
    /// Join a shared folder into a local directory
    Get(GetArgs),
    /// Display shared folder sharing info
    Show(ShowArgs),
    /// List watched directories and known folders
    List(ListArgs),
    /// Update shared folder settings
    Update(UpdateArgs),
    /// Stop watching a local directory
    Unwatch(UnwatchArgs),
    /// Manage folder permissions
    #[command(subcommand)]
    Permission(PermissionCommands),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Local directory to share
    #[arg(short, long, default_value = "")]
    pub path: String,

    /// Shared folder name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Folder settings as key=value pairs
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Skip prompts and use defaults where possible
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Local directory to sync the folder into
    #[arg(short, long, default_value = "")]
    pub path: String,

    /// Folder reference in `owner:folder` or id form
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Skip prompts and use defaults where possible
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show folders known to this account
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Only show folders with this name
    #[arg(short, long, default_value = "")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Also list folders available from the service
    #[arg(short, long)]
    pub available: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Shared folder name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Folder settings as key=value pairs
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UnwatchArgs {
    /// Local directory to stop watching
    #[arg(short, long, default_value = "")]
    pub path: String,

    /// Skip the ancestor-removal confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum PermissionCommands {
    /// Grant access to another user
    Grant(GrantArgs),
    /// Revoke another user's access
    Revoke(RevokeArgs),
}

#[derive(Args, Debug)]
pub struct GrantArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Target username or user id
    #[arg(short, long)]
    pub target: String,

    /// Shared folder name
    #[arg(short, long)]
    pub name: String,

    /// Role to grant
    #[arg(short, long, value_enum)]
    pub role: GrantRole,
}

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Use a specific account (default account when omitted)
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Target username or user id
    #[arg(short, long)]
    pub target: String,

    /// Shared folder name
    #[arg(short, long)]
    pub name: String,
}

/// Grantable roles; ownership is never transferable from here.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GrantRole {
    Read,
    Write,
}

impl From<GrantRole> for Access {
    fn from(role: GrantRole) -> Self {
        match role {
            GrantRole::Read => Access::Read,
            GrantRole::Write => Access::Write,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// Start the sync daemon
    Start(StartArgs),
    /// Stop the sync daemon
    Stop,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Restart the daemon if it is already running
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
