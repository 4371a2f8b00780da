use clap::Subcommand;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_data, read_stdin_json};
use crate::cli::OutputFormat;
use crate::models::ProfileUpdate;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the signed-in user's profile")]
    Show,

    #[command(about = "Update the profile from stdin")]
    Update,
}

pub async fn handle(cmd: ProfileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::load()?;

    match cmd {
        ProfileCommands::Show => {
            let profile = ctx.profile.me().await?;
            output_data(&output_format, &profile)
        }
        ProfileCommands::Update => {
            let update: ProfileUpdate = serde_json::from_value(read_stdin_json()?)?;
            let profile = ctx.profile.update(&update).await?;
            output_data(&output_format, &profile)
        }
    }
}
