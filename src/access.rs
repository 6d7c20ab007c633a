//! Page Access
//!
//! Decides whether the current identity may see a page, and where to send
//! it otherwise. Pure functions; the web front end and the CLI both call
//! them.

use crate::auth::{Identity, Role};

/// Pages of the marketplace front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    /// Dashboard of one role
    Dashboard(Role),
    /// Sales analytics (wholesale business view)
    Analytics,
    /// Account directory
    Directory,
}

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(String),
}

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

impl Page {
    /// URL path of the page
    pub fn path(&self) -> String {
        match self {
            Page::Login => LOGIN_PATH.to_string(),
            Page::Register => "/register".to_string(),
            Page::Dashboard(role) => format!("/dashboard/{}", role.as_str()),
            Page::Analytics => "/analytics".to_string(),
            Page::Directory => "/admin/users".to_string(),
        }
    }

    /// Roles allowed on this page. `None` means public.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Page::Login | Page::Register => None,
            Page::Dashboard(Role::Admin) => Some(&[Role::Admin]),
            Page::Dashboard(Role::Individual) => Some(&[Role::Individual, Role::Admin]),
            Page::Dashboard(Role::Retail) => Some(&[Role::Retail, Role::Admin]),
            Page::Dashboard(Role::Wholesale) => Some(&[Role::Wholesale, Role::Admin]),
            Page::Dashboard(Role::Lab) => Some(&[Role::Lab, Role::Admin]),
            Page::Analytics => Some(&[Role::Wholesale, Role::Admin]),
            Page::Directory => Some(&[Role::Admin]),
        }
    }
}

/// Landing page of a role after login
pub fn home_page(role: Role) -> Page {
    Page::Dashboard(role)
}

/// Check whether `identity` may view `page`
pub fn authorize(identity: Option<&Identity>, page: Page) -> Access {
    match (page.allowed_roles(), identity) {
        // Public pages bounce logged-in users to their dashboard
        (None, Some(identity)) => Access::Redirect(home_page(identity.role).path()),
        (None, None) => Access::Granted,
        (Some(_), None) => Access::Redirect(LOGIN_PATH.to_string()),
        (Some(roles), Some(identity)) if roles.contains(&identity.role) => Access::Granted,
        (Some(_), Some(identity)) => {
            tracing::debug!(role = %identity.role, page = ?page, "Role not allowed on page");
            Access::Redirect(home_page(identity.role).path())
        }
    }
}

/// Navigation entries shown to a role, as (label, path)
pub fn navigation(role: Role) -> Vec<(&'static str, String)> {
    let mut links = vec![("Dashboard", home_page(role).path())];

    if Page::Analytics
        .allowed_roles()
        .is_some_and(|roles| roles.contains(&role))
    {
        links.push(("Analytics", Page::Analytics.path()));
    }
    if role == Role::Admin {
        links.push(("Accounts", Page::Directory.path()));
    }
    links
}
