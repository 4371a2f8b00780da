use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::AppConfig;
use crate::gateway::DataGateway;
use crate::services::{ContentService, ProfileService, SessionService};
use crate::transport::{ContentClient, CredentialProvider, FetchTransport, FileCredentials};

pub const SESSION_FILE: &str = "session.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PORTAL_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("edu-portal").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join(SESSION_FILE))
}

/// Clients wired against one shared file-backed session
pub struct CliContext {
    pub credentials: Arc<FileCredentials>,
    pub gateway: DataGateway,
    pub auth: AuthProvider,
    pub sessions: SessionService,
    pub content: ContentService,
    pub profile: ProfileService,
}

impl CliContext {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_config(crate::config::config(), session_file()?)
    }

    pub fn from_config(config: &AppConfig, session_path: PathBuf) -> anyhow::Result<Self> {
        let credentials = Arc::new(FileCredentials::new(session_path));
        let shared: Arc<dyn CredentialProvider> = credentials.clone();
        let timeout = config.http.request_timeout();

        let transport = Arc::new(FetchTransport::new(shared.clone(), timeout)?);
        let gateway = DataGateway::new(config.backend.base_url.clone(), transport)?;
        let auth = AuthProvider::new(config.backend.base_url.clone(), shared.clone(), timeout)?;

        let client = Arc::new(
            ContentClient::new(config.backend.content_api_url.clone(), shared, timeout)?
                .with_refresh_policy(config.auth.refresh_policy)
                .with_token_header(&config.auth.token_header)?,
        );

        Ok(Self {
            credentials,
            gateway,
            auth,
            sessions: SessionService::new(client.clone()),
            content: ContentService::new(client.clone()),
            profile: ProfileService::new(client),
        })
    }
}
