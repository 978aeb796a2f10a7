//! Session acquisition and lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   ApiClient     │  (vknet-infra) owns the token slot
//! └────────┬────────┘
//!          │ acquire() when the slot is empty or expired
//!          ▼
//! ┌─────────────────┐
//! │ TokenAcquirer   │
//! └────────┬────────┘
//!          ├──► RedirectFlowAcquirer ──► AuthorizationSurface (browser, terminal, script)
//!          └──► StaticTokenAcquirer   (pre-issued token)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use vknet_common::auth::{
//!     AcquireRequest, AuthError, AuthorizationSurface, AuthorizeConfig, Credentials,
//!     RedirectFlowAcquirer, TokenAcquirer,
//! };
//! use vknet_domain::Permission;
//!
//! fn login<S: AuthorizationSurface>(surface: S) -> Result<(), AuthError> {
//!     let acquirer = RedirectFlowAcquirer::new(surface, AuthorizeConfig::new("oauth.vk.com"));
//!     let token = acquirer.acquire(&AcquireRequest {
//!         app_id: 2_951_857,
//!         scopes: vec![Permission::Friends, Permission::Offline],
//!         credentials: Some(Credentials::new("me@example.com", "secret")),
//!     })?;
//!     println!("Logged in as {}", token.user_id());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`session`]**: `SessionToken` and its expiry rules
//! - **[`types`]**: request/credential types, `AuthError`, authorization URL
//!   and redirect parsing
//! - **[`traits`]**: `TokenAcquirer` and `AuthorizationSurface`
//! - **[`redirect_flow`]**: the interactive implicit-grant acquirer
//! - **[`static_token`]**: acquirer for pre-issued tokens

pub mod redirect_flow;
pub mod session;
pub mod static_token;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use redirect_flow::{RedirectFlowAcquirer, DEFAULT_POLL_INTERVAL};
pub use session::SessionToken;
pub use static_token::StaticTokenAcquirer;
pub use traits::{AuthorizationSurface, TokenAcquirer};
pub use types::{
    is_terminal_redirect, parse_redirect, AcquireRequest, AuthError, AuthorizeConfig,
    Credentials, RedirectOutcome,
};
pub use vknet_domain::Permission;
