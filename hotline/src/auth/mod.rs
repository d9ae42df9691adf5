//! Administrator capability check.
//!
//! The caller's `From` number is the only authorization factor. It is asserted
//! by the voice provider, not cryptographically verified, so every admin
//! decision goes through [`CallerAuthorizer`] and nowhere else.

/// Decides whether a caller may use the administrator menu.
pub trait CallerAuthorizer: Send + Sync {
    fn is_admin(&self, from: &str) -> bool;
}

/// Exact-match allow-list of administrator numbers.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    numbers: Vec<String>,
}

impl AdminAllowList {
    pub fn new(numbers: impl IntoIterator<Item = String>) -> Self {
        Self {
            numbers: numbers
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }
}

impl CallerAuthorizer for AdminAllowList {
    fn is_admin(&self, from: &str) -> bool {
        !from.is_empty() && self.numbers.iter().any(|n| n == from)
    }
}
