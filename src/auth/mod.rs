//! GitHub OAuth login
//!
//! Handles:
//! - Redirect to the GitHub authorization page
//! - Callback: state check, code exchange, profile fetch
//! - Token-authenticated outbound HTTP

mod client;
mod github;
mod oauth;
mod profile;

pub use client::AuthenticatedClient;
pub use github::GitHubOAuth;
pub use oauth::{auth_router, home_page};
pub use profile::{GitHubUser, Profile};
