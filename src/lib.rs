//! Cybsi API client library.
//!
//! A Rust library for interacting with the Cybsi threat intelligence
//! REST API. The client is structured around API routes: one handle per
//! API section, each building request paths, params and bodies and
//! parsing JSON responses into typed views.
//!
//! # Quick Start
//!
//! ```no_run
//! use cybsi::observable::{EntityForm, EntityKeyTypes, EntityTypes};
//! use cybsi::{chain_pages, CybsiClient};
//!
//! #[tokio::main]
//! async fn main() -> cybsi::Result<()> {
//!     // Create client from environment variables
//!     let client = CybsiClient::from_env()?;
//!
//!     // Register an entity
//!     let domain = EntityForm::new(EntityTypes::DomainName)
//!         .add_key(EntityKeyTypes::String, "example.com");
//!     let entity_ref = client.observable().entities().register(&domain).await?;
//!     println!("registered entity {}", entity_ref.uuid);
//!
//!     // Aggregate what the system knows about it
//!     let aggregate = client
//!         .observable()
//!         .entities()
//!         .view(entity_ref.uuid, None, None, None)
//!         .await?;
//!     if let Some(threat) = aggregate.threat() {
//!         println!("threat status: {:?}", threat.status);
//!     }
//!
//!     // Walk a paginated list
//!     let first_page = client.data_sources().filter(None, None, Some(50)).await?;
//!     for source in chain_pages(first_page).await? {
//!         println!("data source: {}", source.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`CybsiClient`] owns the HTTP connector and hands out section
//!   handles: [`observable`](CybsiClient::observable),
//!   [`observations`](CybsiClient::observations),
//!   [`artifacts`](CybsiClient::artifacts),
//!   [`enrichment`](CybsiClient::enrichment) and so on.
//! - List endpoints return [`Page`]s linked by opaque [`Cursor`]s; walk
//!   them page by page or drain them with [`chain_pages`].
//! - Partial updates take a [`Tag`] captured from the resource view
//!   (optimistic concurrency) and use the [`Nullable`] tri-state to
//!   distinguish "leave unchanged", "clear" and "set".
//!
//! # Configuration
//!
//! [`CybsiClient::from_env`] reads:
//!
//! - `CYBSI_API_KEY` (required) - API key
//! - `CYBSI_API_URL` (required) - Base URL, e.g. `https://cybsi.example.com/api`

mod client;
mod common;
mod connector;
mod error;
mod pagination;

pub mod artifact;
pub mod auth;
pub mod data_source;
pub mod enrichment;
pub mod observable;
pub mod observation;
pub mod replist;
pub mod report;
pub mod search;
pub mod user;

// Re-export core types
pub use client::{Config, CybsiClient, Version, VersionView};
pub use common::{Nullable, RefView, ShareLevels, Tag};
pub use error::{ApiErrorView, CybsiError, Result, SemanticErrorCodes};
pub use pagination::{chain_pages, Cursor, Page};
