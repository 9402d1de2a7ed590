//! CLI commands for hoist

use clap::Subcommand;
use color_eyre::eyre::Result;

pub mod upload;
pub mod whoami;

/// All available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Upload every configured artifact and apply display names
    Upload(upload::UploadCommand),

    /// Show the account the access key belongs to
    Whoami(whoami::WhoamiCommand),
}

impl Command {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Command::Upload(cmd) => cmd.run().await,
            Command::Whoami(cmd) => cmd.run().await,
        }
    }
}
