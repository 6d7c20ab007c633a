//! Auth State
//!
//! Wraps the core `SessionStore` for the component tree. The store stays
//! the single source of truth; its subscriber mirrors every transition into
//! the `identity` signal that pages and the navigation bar react to.

use std::cell::RefCell;
use std::rc::Rc;

use bepawa::auth::{
    AuthResult, CredentialDirectory, CredentialHasher, Identity, KvDirectory, NewIdentity,
    SessionStore,
};
use leptos::*;

use super::storage::BrowserStorage;

type BrowserSession = SessionStore<KvDirectory<Rc<BrowserStorage>>, Rc<BrowserStorage>>;

/// Argon2 cost for in-browser hashing. Lower than the native default so the
/// first-visit seed of five demo accounts stays responsive.
const BROWSER_HASH_MEMORY_KIB: u32 = 4096;
const BROWSER_HASH_ITERATIONS: u32 = 2;

/// Session handle shared through context
#[derive(Clone)]
pub struct AuthState {
    store: Rc<RefCell<BrowserSession>>,
    /// Logged-in identity, `None` when logged out
    pub identity: RwSignal<Option<Identity>>,
    /// True while a login or registration is being processed
    pub busy: RwSignal<bool>,
}

/// Build the session store over `localStorage`, restore any saved session
/// and provide it to the component tree
pub fn provide_auth_state() {
    let storage = Rc::new(BrowserStorage::local());

    let hasher = CredentialHasher::new(BROWSER_HASH_MEMORY_KIB, BROWSER_HASH_ITERATIONS, 1)
        .unwrap_or_default();

    let mut store = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), storage).hasher(hasher);

    let identity = create_rw_signal(None::<Identity>);
    store.subscribe(move |state| identity.set(state.identity().cloned()));
    store.initialize();

    provide_context(AuthState {
        store: Rc::new(RefCell::new(store)),
        identity,
        busy: create_rw_signal(false),
    });
}

/// Fetch the auth state from context
pub fn use_auth() -> AuthState {
    use_context::<AuthState>().expect("AuthState not found")
}

impl AuthState {
    pub fn login(&self, email: &str, password: &str) -> AuthResult<Identity> {
        self.busy.set(true);
        // Effects fire after the batch, once the store borrow is released
        let result = batch(|| self.store.borrow_mut().login(email, password));
        self.busy.set(false);
        result
    }

    pub fn register(&self, input: NewIdentity) -> AuthResult<Identity> {
        self.busy.set(true);
        let result = batch(|| self.store.borrow_mut().register(input));
        self.busy.set(false);
        result
    }

    pub fn logout(&self) {
        batch(|| self.store.borrow_mut().logout());
    }

    /// Every account in the directory, without credentials
    pub fn accounts(&self) -> AuthResult<Vec<Identity>> {
        let records = self.store.borrow().directory().records()?;
        Ok(records.into_iter().map(Identity::from).collect())
    }
}
