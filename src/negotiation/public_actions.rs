//! Actions exempt from authentication and authorization for one request cycle.

/// Set of public action names. Names are unique; order carries no meaning.
///
/// ```
/// use axum_api_negotiation::PublicActions;
///
/// let mut actions = PublicActions::from_iter(["edit", "view"]);
/// assert!(actions.deny("edit"));
/// assert!(!actions.deny("missing"));
/// assert!(actions.is_public("view"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicActions {
    actions: Vec<String>,
}

impl PublicActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `action`. Returns whether it was present; absence is not an error.
    pub fn deny(&mut self, action: &str) -> bool {
        match self.actions.iter().position(|a| a == action) {
            Some(pos) => {
                self.actions.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Adds `action`. Returns whether it was newly inserted.
    pub fn allow(&mut self, action: impl Into<String>) -> bool {
        let action = action.into();
        if self.is_public(&action) {
            return false;
        }
        self.actions.push(action);
        true
    }

    pub fn is_public(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// Copies `seed` in only when the registry is still empty. Returns whether
    /// seeding happened.
    pub fn seed_if_empty<I, S>(&mut self, seed: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.is_empty() {
            return false;
        }
        for action in seed {
            self.allow(action);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for PublicActions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut actions = Self::new();
        for action in iter {
            actions.allow(action);
        }
        actions
    }
}
