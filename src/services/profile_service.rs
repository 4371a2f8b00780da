use std::sync::Arc;

use crate::error::GatewayError;
use crate::models::{Profile, ProfileUpdate};
use crate::transport::{ContentClient, Method};

pub const PROFILE_PATH: &str = "profile/v1/me";

pub struct ProfileService {
    client: Arc<ContentClient>,
}

impl ProfileService {
    pub fn new(client: Arc<ContentClient>) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<Profile, GatewayError> {
        self.client.authorized(Method::GET, PROFILE_PATH, None).await
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile, GatewayError> {
        let body = serde_json::to_value(update)?;
        self.client.authorized(Method::PUT, PROFILE_PATH, Some(&body)).await
    }
}
