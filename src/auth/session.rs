//! Session Store
//!
//! Owns the "who is logged in" state and mirrors it to the key-value store
//! so it survives a reload.
//!
//! # State machine
//!
//! ```text
//!            login ok / restore ok
//! LoggedOut ───────────────────────▶ LoggedIn(identity)
//!     ▲                                   │
//!     └────────────── logout ─────────────┘
//! ```
//!
//! `register` appends to the directory and never changes the state.

use chrono::Utc;

use super::directory::CredentialDirectory;
use super::error::{AuthError, AuthResult};
use super::password::CredentialHasher;
use super::seed::demo_records;
use super::types::{Identity, IdentityRecord, NewIdentity, SessionState};
use crate::storage::{KeyValueStore, SESSION_KEY};

type Listener = Box<dyn Fn(&SessionState)>;

/// Authentication state plus the three transitions that change it
pub struct SessionStore<D, S> {
    directory: D,
    storage: S,
    session_key: String,
    hasher: CredentialHasher,
    seed_demo_accounts: bool,
    state: SessionState,
    busy: bool,
    listeners: Vec<Listener>,
}

impl<D: CredentialDirectory, S: KeyValueStore> SessionStore<D, S> {
    /// Create a logged-out store. Call [`initialize`](Self::initialize) before use.
    pub fn new(directory: D, storage: S) -> Self {
        Self {
            directory,
            storage,
            session_key: SESSION_KEY.to_string(),
            hasher: CredentialHasher::default(),
            seed_demo_accounts: true,
            state: SessionState::LoggedOut,
            busy: false,
            listeners: Vec::new(),
        }
    }

    /// Builder method: storage key for the persisted session
    pub fn session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Builder method: credential hasher
    pub fn hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Builder method: whether an empty directory gets the demo accounts
    pub fn seed_demo_accounts(mut self, enabled: bool) -> Self {
        self.seed_demo_accounts = enabled;
        self
    }

    /// Seed an empty directory and restore a previously saved session.
    ///
    /// Never fails: storage errors are logged and a malformed session is
    /// discarded, leaving the store logged out.
    pub fn initialize(&mut self) {
        self.busy = true;

        if self.seed_demo_accounts {
            self.seed_if_empty();
        }

        if let Some(identity) = self.restore_session() {
            tracing::info!(email = %identity.email, role = %identity.role, "Restored saved session");
            self.transition(SessionState::LoggedIn(identity));
        }

        self.busy = false;
    }

    fn seed_if_empty(&self) {
        match self.directory.is_empty() {
            Ok(true) => match demo_records(&self.hasher).and_then(|r| self.directory.seed(r)) {
                Ok(()) => tracing::info!("Seeded credential directory with demo accounts"),
                Err(e) => tracing::warn!(error = %e, "Failed to seed credential directory"),
            },
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Could not read credential directory"),
        }
    }

    fn restore_session(&self) -> Option<Identity> {
        let raw = match self.storage.get(&self.session_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved session");
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupted session");
                if let Err(e) = self.storage.remove(&self.session_key) {
                    tracing::warn!(error = %e, "Failed to remove corrupted session");
                }
                None
            }
        }
    }

    /// Authenticate and, on success, become logged in as the matching record.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        self.busy = true;
        let result = self.try_login(email, password);
        self.busy = false;

        let identity = result?;
        self.persist_session(&identity);
        self.transition(SessionState::LoggedIn(identity.clone()));

        tracing::info!(email = %identity.email, role = %identity.role, "Login succeeded");
        Ok(identity)
    }

    fn try_login(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let record = match self.directory.find_by_email(email) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(email = %email, "Login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &record.password_hash) {
            tracing::debug!(email = %email, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !record.is_approved && !record.role.bypasses_approval_gate() {
            tracing::info!(email = %record.email, role = %record.role, "Login blocked pending approval");
            return Err(AuthError::ApprovalPending);
        }

        Ok(record.into())
    }

    fn persist_session(&self, identity: &Identity) {
        let result = serde_json::to_string(identity)
            .map_err(crate::storage::StorageError::from)
            .and_then(|json| self.storage.set(&self.session_key, &json));

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist session; it will not survive a reload");
        }
    }

    /// Create a new account. Does not log in.
    pub fn register(&mut self, input: NewIdentity) -> AuthResult<Identity> {
        self.busy = true;
        let result = self.try_register(input);
        self.busy = false;
        result
    }

    fn try_register(&self, input: NewIdentity) -> AuthResult<Identity> {
        let email = input.email.trim().to_string();
        validate_registration(&email, &input.password)?;

        let existing = self.directory.records().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read credential directory");
            Vec::new()
        });

        if existing.iter().any(|r| r.email_matches(&email)) {
            return Err(AuthError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = IdentityRecord {
            id: next_id(&existing, now.timestamp_millis()),
            email,
            name: input.name.trim().to_string(),
            role: input.role,
            password_hash: self.hasher.hash(&input.password)?,
            is_approved: input.role.auto_approved(),
            created_at: now,
            profile: input.profile,
        };

        let identity = record.to_identity();
        self.directory.insert(record)?;

        tracing::info!(
            email = %identity.email,
            role = %identity.role,
            approved = identity.is_approved,
            "Registered account"
        );
        Ok(identity)
    }

    /// Forget the current session, in memory and in storage
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(&self.session_key) {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }

        if let Some(identity) = self.state.identity() {
            tracing::info!(email = %identity.email, "Logged out");
        }
        self.transition(SessionState::LoggedOut);
    }

    /// Logged-in identity, if any
    pub fn current(&self) -> Option<&Identity> {
        self.state.identity()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True only while an operation is running
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Call `listener` with the new state after every transition
    pub fn subscribe(&mut self, listener: impl Fn(&SessionState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Credential directory backing this store
    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn transition(&mut self, next: SessionState) {
        self.state = next;
        for listener in &self.listeners {
            listener(&self.state);
        }
    }
}

fn validate_registration(email: &str, password: &str) -> AuthResult<()> {
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };

    if !valid_email {
        return Err(AuthError::Validation("Email address is invalid".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    Ok(())
}

/// Millisecond timestamp, bumped past any id already in use
fn next_id(existing: &[IdentityRecord], now_ms: i64) -> String {
    let mut candidate = now_ms;
    while existing.iter().any(|r| r.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::directory::KvDirectory;
    use crate::auth::types::{Profile, Role};
    use crate::storage::{MemoryStore, StorageError, StorageResult, DIRECTORY_KEY};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type TestStore = SessionStore<KvDirectory<Rc<MemoryStore>>, Rc<MemoryStore>>;

    fn create_test_store() -> (TestStore, Rc<MemoryStore>) {
        let storage = Rc::new(MemoryStore::new());
        let mut store = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast());
        store.initialize();
        (store, storage)
    }

    fn unapproved(store: &TestStore, email: &str, role: Role) -> IdentityRecord {
        let hasher = CredentialHasher::insecure_fast();
        let record = IdentityRecord {
            id: format!("manual-{}", email),
            email: email.to_string(),
            name: String::new(),
            role,
            password_hash: hasher.hash("secret").unwrap(),
            is_approved: false,
            created_at: Utc::now(),
            profile: Profile::default(),
        };
        store.directory().insert(record.clone()).unwrap();
        record
    }

    #[test]
    fn test_initialize_seeds_empty_directory() {
        let (store, _) = create_test_store();
        assert_eq!(store.directory().records().unwrap().len(), 5);
        assert!(store.current().is_none());
        assert!(!store.is_busy());
    }

    #[test]
    fn test_initialize_does_not_reseed() {
        let (mut store, storage) = create_test_store();
        store
            .register(NewIdentity::new("extra@x.com", Role::Individual, "p"))
            .unwrap();

        let mut again = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast());
        again.initialize();
        assert_eq!(again.directory().records().unwrap().len(), 6);
    }

    #[test]
    fn test_seeding_can_be_disabled() {
        let storage = Rc::new(MemoryStore::new());
        let mut store = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast())
            .seed_demo_accounts(false);
        store.initialize();
        assert!(store.directory().is_empty().unwrap());
    }

    #[test]
    fn test_admin_login_scenario() {
        let (mut store, storage) = create_test_store();

        let identity = store.login("admin@bepawa.com", "admin123").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(store.current(), Some(&identity));

        let saved = storage.get(SESSION_KEY).unwrap().unwrap();
        assert!(!saved.contains("passwordHash"));
        assert!(!saved.contains("admin123"));

        let err = store.login("admin@bepawa.com", "wrongpass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_login_equals_record_minus_credential() {
        let (mut store, _) = create_test_store();
        let record = store
            .directory()
            .find_by_email("retail@bepawa.com")
            .unwrap()
            .unwrap();

        let identity = store.login("RETAIL@bepawa.com", "retail123").unwrap();
        assert_eq!(identity, record.to_identity());
    }

    #[test]
    fn test_login_unknown_email() {
        let (mut store, _) = create_test_store();
        let err = store.login("nobody@bepawa.com", "admin123").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_unapproved_business_roles_are_blocked() {
        let (mut store, storage) = create_test_store();

        for (email, role) in [
            ("r@x.com", Role::Retail),
            ("w@x.com", Role::Wholesale),
            ("l@x.com", Role::Lab),
        ] {
            unapproved(&store, email, role);
            let err = store.login(email, "secret").unwrap_err();
            assert!(matches!(err, AuthError::ApprovalPending));
            assert!(store.current().is_none());
            assert!(storage.get(SESSION_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn test_pending_login_keeps_existing_session() {
        let (mut store, _) = create_test_store();
        store.login("individual@bepawa.com", "individual123").unwrap();
        unapproved(&store, "pending@x.com", Role::Retail);

        assert!(store.login("pending@x.com", "secret").is_err());
        assert_eq!(store.current().unwrap().email, "individual@bepawa.com");
    }

    #[test]
    fn test_individual_and_admin_bypass_approval_gate() {
        let (mut store, _) = create_test_store();
        unapproved(&store, "i@x.com", Role::Individual);
        unapproved(&store, "a@x.com", Role::Admin);

        assert!(store.login("i@x.com", "secret").is_ok());
        assert!(store.login("a@x.com", "secret").is_ok());
    }

    #[test]
    fn test_register_approval_defaults() {
        let (mut store, _) = create_test_store();

        for (email, role, approved) in [
            ("retail@new.com", Role::Retail, false),
            ("wholesale@new.com", Role::Wholesale, false),
            ("lab@new.com", Role::Lab, false),
            ("individual@new.com", Role::Individual, true),
            ("admin@new.com", Role::Admin, true),
        ] {
            store.register(NewIdentity::new(email, role, "pw")).unwrap();
            let stored = store.directory().find_by_email(email).unwrap().unwrap();
            assert_eq!(stored.is_approved, approved, "{}", role);
        }
    }

    #[test]
    fn test_register_scenario_then_duplicate() {
        let (mut store, storage) = create_test_store();

        let identity = store
            .register(NewIdentity::new("new@x.com", Role::Retail, "p"))
            .unwrap();
        assert!(!identity.is_approved);

        let before = storage.get(DIRECTORY_KEY).unwrap();
        let err = store
            .register(NewIdentity::new("NEW@x.com", Role::Individual, "q"))
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(storage.get(DIRECTORY_KEY).unwrap(), before);
    }

    #[test]
    fn test_register_does_not_log_in() {
        let (mut store, _) = create_test_store();
        store
            .register(NewIdentity::new("solo@x.com", Role::Individual, "p"))
            .unwrap();
        assert!(store.current().is_none());

        store.login("admin@bepawa.com", "admin123").unwrap();
        store
            .register(NewIdentity::new("other@x.com", Role::Individual, "p"))
            .unwrap();
        assert_eq!(store.current().unwrap().email, "admin@bepawa.com");
    }

    #[test]
    fn test_registered_account_can_log_in() {
        let (mut store, _) = create_test_store();
        store
            .register(
                NewIdentity::new("  Jane@Example.com ", Role::Individual, "hunter2").name("Jane"),
            )
            .unwrap();

        let identity = store.login("jane@example.com", "hunter2").unwrap();
        assert_eq!(identity.email, "Jane@Example.com");
        assert_eq!(identity.name, "Jane");
    }

    #[test]
    fn test_register_validation() {
        let (mut store, _) = create_test_store();

        let err = store
            .register(NewIdentity::new("not-an-email", Role::Individual, "p"))
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = store
            .register(NewIdentity::new("ok@x.com", Role::Individual, ""))
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_register_assigns_unique_ids() {
        let (mut store, _) = create_test_store();
        for i in 0..5 {
            store
                .register(NewIdentity::new(format!("u{}@x.com", i), Role::Individual, "p"))
                .unwrap();
        }

        let mut ids: Vec<_> = store
            .directory()
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_logout_clears_session() {
        let (mut store, storage) = create_test_store();
        store.login("lab@bepawa.com", "lab123").unwrap();

        store.logout();
        assert!(store.current().is_none());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());

        // Logging out again is harmless
        store.logout();
        assert_eq!(store.state(), &SessionState::LoggedOut);
    }

    #[test]
    fn test_session_restored_on_initialize() {
        let (mut store, storage) = create_test_store();
        let identity = store.login("wholesale@bepawa.com", "wholesale123").unwrap();

        let mut reloaded = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast());
        reloaded.initialize();
        assert_eq!(reloaded.current(), Some(&identity));
    }

    #[test]
    fn test_corrupted_session_is_discarded() {
        let storage = Rc::new(MemoryStore::new());
        storage.set(SESSION_KEY, "{\"id\": 12, broken").unwrap();

        let mut store = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast());
        store.initialize();

        assert!(store.current().is_none());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_custom_session_key() {
        let storage = Rc::new(MemoryStore::new());
        let mut store = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast())
            .session_key("tab_session");
        store.initialize();
        store.login("admin@bepawa.com", "admin123").unwrap();

        assert!(storage.get("tab_session").unwrap().is_some());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_listeners_observe_transitions() {
        let (mut store, _) = create_test_store();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe(move |state| sink.borrow_mut().push(state.is_logged_in()));

        store.login("admin@bepawa.com", "admin123").unwrap();
        let _ = store.login("admin@bepawa.com", "nope");
        store
            .register(NewIdentity::new("quiet@x.com", Role::Individual, "p"))
            .unwrap();
        store.logout();

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_next_id_skips_taken() {
        let hasher = CredentialHasher::insecure_fast();
        let records = demo_records(&hasher).unwrap();
        // demo ids are "1".."5"
        assert_eq!(next_id(&records, 1), "6");
        assert_eq!(next_id(&records, 1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_not_busy_between_operations() {
        let (mut store, _) = create_test_store();
        assert!(!store.is_busy());

        store.login("retail@bepawa.com", "retail123").unwrap();
        assert!(!store.is_busy());

        let _ = store.login("retail@bepawa.com", "nope");
        assert!(!store.is_busy());
    }

    #[test]
    fn test_non_ascii_case_duplicate_email() {
        let (mut store, _) = create_test_store();
        store
            .register(NewIdentity::new("JOSÉ@x.com", Role::Individual, "p"))
            .unwrap();

        let err = store
            .register(NewIdentity::new("josé@x.com", Role::Retail, "q"))
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert!(store.login("José@X.com", "p").is_ok());
    }

    #[test]
    fn test_unreadable_record_does_not_trigger_reseed() {
        let (mut store, storage) = create_test_store();
        store
            .register(NewIdentity::new("keep@x.com", Role::Individual, "p"))
            .unwrap();

        let mut entries: Vec<serde_json::Value> =
            serde_json::from_str(&storage.get(DIRECTORY_KEY).unwrap().unwrap()).unwrap();
        let mut bad = entries[0].clone();
        bad["email"] = "doctor@x.com".into();
        bad["role"] = "doctor".into();
        entries.push(bad);
        storage
            .set(DIRECTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        let mut restarted = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), Rc::clone(&storage))
            .hasher(CredentialHasher::insecure_fast());
        restarted.initialize();

        let emails: Vec<String> = restarted
            .directory()
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.email)
            .collect();
        assert!(emails.contains(&"keep@x.com".to_string()));
        assert!(emails.contains(&"admin@bepawa.com".to_string()));
        assert!(restarted.login("keep@x.com", "p").is_ok());
    }

    /// Memory store whose operations can be switched to fail
    struct FlakyStore {
        inner: MemoryStore,
        failing: Cell<bool>,
    }

    impl FlakyStore {
        fn new(failing: bool) -> Self {
            Self {
                inner: MemoryStore::new(),
                failing: Cell::new(failing),
            }
        }

        fn check(&self) -> StorageResult<()> {
            if self.failing.get() {
                Err(StorageError::Unavailable("storage disabled".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.check()?;
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.check()?;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.check()?;
            self.inner.remove(key)
        }
    }

    fn flaky_session(storage: &Rc<FlakyStore>) -> SessionStore<KvDirectory<Rc<FlakyStore>>, Rc<FlakyStore>> {
        SessionStore::new(KvDirectory::new(Rc::clone(storage)), Rc::clone(storage))
            .hasher(CredentialHasher::insecure_fast())
    }

    #[test]
    fn test_initialize_on_unavailable_storage_stays_logged_out() {
        let storage = Rc::new(FlakyStore::new(true));
        let mut store = flaky_session(&storage);
        store.initialize();

        assert!(store.current().is_none());
        assert!(!store.is_busy());
    }

    #[test]
    fn test_lookup_failure_is_invalid_credentials() {
        let storage = Rc::new(FlakyStore::new(false));
        let mut store = flaky_session(&storage);
        store.initialize();
        let admin = store.login("admin@bepawa.com", "admin123").unwrap();

        storage.failing.set(true);
        let err = store.login("lab@bepawa.com", "lab123").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(store.current(), Some(&admin));
    }

    #[test]
    fn test_register_on_unavailable_storage_fails() {
        let storage = Rc::new(FlakyStore::new(true));
        let mut store = flaky_session(&storage);
        store.initialize();

        let err = store
            .register(NewIdentity::new("late@x.com", Role::Individual, "p"))
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage(StorageError::Unavailable(_))));
        assert!(store.current().is_none());
    }
}
