//! # Bepawa
//!
//! Core of the Bepawa pharmacy marketplace front end: the session store
//! that decides who is logged in, the credential directory behind it, page
//! access rules, and the analytics shown on the dashboards.
//!
//! ## Modules
//!
//! - [`storage`]: Local-storage style key-value backends
//! - [`auth`]: Identity records, credential hashing, session state machine
//! - [`access`]: Role-based page gating
//! - [`analytics`]: Sample sales data, aggregation and CSV export
//! - `config`: TOML configuration (feature `native`)
//!
//! ## Quick Start
//!
//! ```rust
//! use bepawa::auth::{CredentialHasher, KvDirectory, SessionStore};
//! use bepawa::access::{authorize, Access, Page};
//! use bepawa::storage::MemoryStore;
//! use std::rc::Rc;
//!
//! let storage = Rc::new(MemoryStore::new());
//! let mut session = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), storage)
//!     .hasher(CredentialHasher::insecure_fast());
//!
//! // Seeds the demo accounts and restores any saved session
//! session.initialize();
//!
//! session.login("wholesale@bepawa.com", "wholesale123").unwrap();
//! assert_eq!(authorize(session.current(), Page::Analytics), Access::Granted);
//!
//! let summary = bepawa::analytics::summarize(&bepawa::analytics::wholesale_sales());
//! assert_eq!(summary.total_orders, 910);
//! ```

pub mod access;
pub mod analytics;
pub mod auth;
#[cfg(feature = "native")]
pub mod config;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};

#[cfg(feature = "native")]
pub use storage::FileStore;

pub use auth::{
    AuthError, AuthResult, CredentialDirectory, CredentialHasher, Identity, IdentityRecord,
    KvDirectory, NewIdentity, Profile, Role, SessionState, SessionStore,
};

#[cfg(feature = "sqlite")]
pub use auth::SqliteDirectory;

pub use access::{authorize, Access, Page};

pub use analytics::{summarize, wholesale_sales, SalesDataset, SalesSummary};

#[cfg(feature = "native")]
pub use config::{AuthConfig, Config, ConfigError, DirectoryBackend, LoggingConfig, StorageConfig};
