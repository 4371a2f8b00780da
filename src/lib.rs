pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod query;
pub mod resource;
pub mod services;
pub mod transport;

pub use error::GatewayError;
pub use gateway::DataGateway;
pub use resource::Resource;

#[cfg(test)]
pub mod testing;
