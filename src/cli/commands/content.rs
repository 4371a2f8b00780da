use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::models::{Clip, News, Project, RecordId};
use crate::services::{ContentItem, ContentKind, ContentService};

#[derive(Subcommand)]
pub enum ContentCommands {
    #[command(about = "List published items")]
    List {
        #[arg(help = "news, projects or clips")]
        kind: ContentKind,
    },

    #[command(about = "Show one item")]
    Show {
        #[arg(help = "news, projects or clips")]
        kind: ContentKind,
        #[arg(help = "Item ID")]
        id: RecordId,
    },

    #[command(about = "Like an item")]
    Like {
        #[arg(help = "news, projects or clips")]
        kind: ContentKind,
        #[arg(help = "Item ID")]
        id: RecordId,
    },

    #[command(about = "Remove a like")]
    Unlike {
        #[arg(help = "news, projects or clips")]
        kind: ContentKind,
        #[arg(help = "Item ID")]
        id: RecordId,
    },
}

pub async fn handle(cmd: ContentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::load()?;
    let content = &ctx.content;

    match cmd {
        ContentCommands::List { kind } => match kind {
            ContentKind::News => list::<News>(content, &output_format).await,
            ContentKind::Projects => list::<Project>(content, &output_format).await,
            ContentKind::Clips => list::<Clip>(content, &output_format).await,
        },
        ContentCommands::Show { kind, id } => match kind {
            ContentKind::News => show::<News>(content, &id, &output_format).await,
            ContentKind::Projects => show::<Project>(content, &id, &output_format).await,
            ContentKind::Clips => show::<Clip>(content, &id, &output_format).await,
        },
        ContentCommands::Like { kind, id } => {
            let response = content.like(kind, &id).await?;
            output_success(&output_format, &format!("Liked {} {}", kind, id), Some(json!({ "response": response })))
        }
        ContentCommands::Unlike { kind, id } => {
            let response = content.unlike(kind, &id).await?;
            output_success(&output_format, &format!("Unliked {} {}", kind, id), Some(json!({ "response": response })))
        }
    }
}

async fn list<T: ContentItem>(content: &ContentService, output_format: &OutputFormat) -> anyhow::Result<()> {
    let items = content.list::<T>().await?;
    output_data(output_format, &json!({ "data": items }))
}

async fn show<T: ContentItem>(content: &ContentService, id: &RecordId, output_format: &OutputFormat) -> anyhow::Result<()> {
    let item = content.get::<T>(id).await?;
    output_data(output_format, &json!({ "data": item }))
}
