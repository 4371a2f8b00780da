use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Backend collections reachable through the data gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Users,
    Attachments,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Users, Resource::Attachments];

    /// Name used by callers and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Attachments => "attachments",
        }
    }

    /// Endpoint path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Users => "api/users/v1",
            Resource::Attachments => "api/storage/v1/attachments",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| GatewayError::UnknownResource(s.to_string()))
    }
}
