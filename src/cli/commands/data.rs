use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::config::CliContext;
use crate::cli::utils::{output_data, parse_filter, read_stdin_json};
use crate::cli::OutputFormat;
use crate::error::GatewayError;
use crate::models::{Attachment, AttachmentUpload, RawFile, RecordId, ResourceRecord, User, UserDraft};
use crate::query::{ListParams, Pagination, ReferenceParams, Sort};
use crate::resource::Resource;

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
    pub page: u64,
    #[arg(long, default_value_t = 10, help = "Records per page")]
    pub per_page: u64,
    #[arg(long, default_value = "id", help = "Sort as \"field [asc|desc]\"")]
    pub sort: String,
    #[arg(long, help = "JSON filter object")]
    pub filter: Option<String>,
}

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List one page of records")]
    List {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[command(flatten)]
        page: PageArgs,
    },

    #[command(about = "Fetch one record")]
    Get {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: RecordId,
    },

    #[command(about = "Fetch several records by id")]
    GetMany {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record IDs")]
        ids: Vec<RecordId>,
    },

    #[command(about = "List records referencing another record")]
    Reference {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Referencing field, e.g. ownerId")]
        target: String,
        #[arg(help = "Referenced record ID")]
        id: RecordId,
        #[command(flatten)]
        page: PageArgs,
    },

    #[command(about = "Create record from stdin (attachments from --file)")]
    Create {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(long, help = "File to upload as an attachment")]
        file: Option<PathBuf>,
        #[arg(long, help = "Attachment title")]
        title: Option<String>,
    },

    #[command(about = "Update record from stdin")]
    Update {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID to update")]
        id: RecordId,
    },

    #[command(about = "Apply the same update from stdin to several records")]
    UpdateMany {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(required = true, help = "Record IDs to update")]
        ids: Vec<RecordId>,
    },

    #[command(about = "Delete record")]
    Delete {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(help = "Record ID to delete")]
        id: RecordId,
    },

    #[command(about = "Delete several records")]
    DeleteMany {
        #[arg(help = "Resource name")]
        resource: Resource,
        #[arg(required = true, help = "Record IDs to delete")]
        ids: Vec<RecordId>,
    },
}

impl DataCommands {
    fn resource(&self) -> Resource {
        match self {
            DataCommands::List { resource, .. }
            | DataCommands::Get { resource, .. }
            | DataCommands::GetMany { resource, .. }
            | DataCommands::Reference { resource, .. }
            | DataCommands::Create { resource, .. }
            | DataCommands::Update { resource, .. }
            | DataCommands::UpdateMany { resource, .. }
            | DataCommands::Delete { resource, .. }
            | DataCommands::DeleteMany { resource, .. } => *resource,
        }
    }
}

/// Builds a create payload from command-line input
trait CliDraft: Sized {
    fn from_cli(file: Option<PathBuf>, title: Option<String>) -> anyhow::Result<Self>;
}

impl CliDraft for UserDraft {
    fn from_cli(_file: Option<PathBuf>, _title: Option<String>) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(read_stdin_json()?)?)
    }
}

impl CliDraft for AttachmentUpload {
    fn from_cli(file: Option<PathBuf>, title: Option<String>) -> anyhow::Result<Self> {
        let path = file.ok_or_else(|| anyhow::anyhow!("Attachments are created with --file PATH"))?;
        let mut upload = AttachmentUpload::new(RawFile::from_path(&path)?);
        upload.attachments.title = title;
        Ok(upload)
    }
}

pub async fn handle(cmd: DataCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::load()?;

    match cmd.resource() {
        Resource::Users => run::<User>(&ctx, cmd, &output_format).await,
        Resource::Attachments => run::<Attachment>(&ctx, cmd, &output_format).await,
    }
}

async fn run<R>(ctx: &CliContext, cmd: DataCommands, output_format: &OutputFormat) -> anyhow::Result<()>
where
    R: ResourceRecord,
    R::Draft: CliDraft,
{
    let gateway = &ctx.gateway;

    match cmd {
        DataCommands::List { page, .. } => {
            let params = ListParams {
                pagination: Pagination::new(page.page, page.per_page),
                sort: page.sort.parse::<Sort>()?,
                filter: parse_filter(page.filter.as_deref())?,
            };
            let result = checked(ctx, gateway.get_list::<R>(&params).await)?;
            output_data(output_format, &result)
        }
        DataCommands::Get { id, .. } => {
            let result = checked(ctx, gateway.get_one::<R>(&id).await)?;
            output_data(output_format, &result)
        }
        DataCommands::GetMany { ids, .. } => {
            let result = checked(ctx, gateway.get_many::<R>(&ids).await)?;
            output_data(output_format, &result)
        }
        DataCommands::Reference { target, id, page, .. } => {
            let params = ReferenceParams {
                target,
                id,
                pagination: Pagination::new(page.page, page.per_page),
                sort: page.sort.parse::<Sort>()?,
                filter: parse_filter(page.filter.as_deref())?,
            };
            let result = checked(ctx, gateway.get_many_reference::<R>(&params).await)?;
            output_data(output_format, &result)
        }
        DataCommands::Create { file, title, .. } => {
            let draft = <R::Draft as CliDraft>::from_cli(file, title)?;
            let result = checked(ctx, gateway.create::<R>(draft).await)?;
            output_data(output_format, &result)
        }
        DataCommands::Update { id, .. } => {
            let patch = read_stdin_json()?;
            let result = checked(ctx, gateway.update::<R>(&id, &patch).await)?;
            output_data(output_format, &result)
        }
        DataCommands::UpdateMany { ids, .. } => {
            let patch = read_stdin_json()?;
            let result = checked(ctx, gateway.update_many::<R>(&ids, &patch).await)?;
            output_data(output_format, &result)
        }
        DataCommands::Delete { id, .. } => {
            let result = checked(ctx, gateway.delete::<R>(&id).await)?;
            output_data(output_format, &result)
        }
        DataCommands::DeleteMany { ids, .. } => {
            let result = checked(ctx, gateway.delete_many::<R>(&ids).await)?;
            output_data(output_format, &result)
        }
    }
}

/// Drop the stored session when the backend rejected it
fn checked<T>(ctx: &CliContext, result: Result<T, GatewayError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            ctx.auth.check_error(&err)?;
            Err(err.into())
        }
    }
}
