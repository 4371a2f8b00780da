pub mod auth;
pub mod content;
pub mod data;
pub mod profile;
