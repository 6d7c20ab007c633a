//! Bepawa Authentication
//!
//! - **types**: Identity records, roles, session state
//! - **password**: Argon2 credential hashing
//! - **directory**: Credential directory trait and key-value backend
//! - **sqlite**: Indexed directory with storage-enforced uniqueness
//! - **seed**: Demo accounts for first start
//! - **session**: The session store state machine
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use bepawa::auth::{CredentialHasher, KvDirectory, NewIdentity, Role, SessionStore};
//! use bepawa::storage::MemoryStore;
//! use std::rc::Rc;
//!
//! let storage = Rc::new(MemoryStore::new());
//! let mut session = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), storage)
//!     .hasher(CredentialHasher::insecure_fast());
//! session.initialize();
//!
//! let admin = session.login("admin@bepawa.com", "admin123").unwrap();
//! assert_eq!(admin.role, Role::Admin);
//!
//! let pending = session.register(NewIdentity::new("new@x.com", Role::Retail, "p")).unwrap();
//! assert!(!pending.is_approved);
//!
//! session.logout();
//! assert!(session.current().is_none());
//! ```

pub mod directory;
pub mod error;
pub mod password;
pub mod seed;
pub mod session;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod types;

pub use directory::{CredentialDirectory, KvDirectory};
pub use error::{AuthError, AuthResult};
pub use password::CredentialHasher;
pub use seed::{demo_records, DemoAccount, DEMO_ACCOUNTS};
pub use session::SessionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDirectory;
pub use types::{email_key, Identity, IdentityRecord, NewIdentity, Profile, Role, SessionState};
