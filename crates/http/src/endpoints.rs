//! Paths of the backend resources the client talks to.

use std::fmt;

use url::Url;

/// A backend resource, rendered as a path relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Signup,
    Books,
    Book(u64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/api/login".to_string(),
            Endpoint::Signup => "/api/signup".to_string(),
            Endpoint::Books => "/api/books".to_string(),
            Endpoint::Book(id) => format!("/api/books/{id}"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Append `path` to `base`, keeping any path prefix the base already carries.
pub fn join(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}
