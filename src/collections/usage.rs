use crate::error::SurfaceError;

/// One tracked user and how many times it currently uses the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage<U> {
    /// The user.
    pub user: U,
    /// The number of uses, always at least 1 while tracked.
    pub uses: u32,
}

/// A multiset of users with per-user reference counts.
///
/// Used by vertices (users are edges) and edges (users are faces). Users keep
/// the order in which they were first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageTracker<U> {
    users: Vec<Usage<U>>,
}

impl<U> Default for UsageTracker<U> {
    fn default() -> Self {
        Self { users: Vec::new() }
    }
}

impl<U: Copy + PartialEq> UsageTracker<U> {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tracker with room for `capacity` distinct users.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: Vec::with_capacity(capacity),
        }
    }

    /// Number of distinct users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` when nothing uses the owner.
    #[must_use]
    pub fn is_unused(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns `true` if `user` is tracked.
    #[must_use]
    pub fn has_user(&self, user: U) -> bool {
        self.position(user).is_some()
    }

    /// Number of times `user` uses the owner (0 if untracked).
    #[cfg(test)]
    pub(crate) fn uses_of(&self, user: U) -> u32 {
        self.position(user).map_or(0, |i| self.users[i].uses)
    }

    /// Iterates the distinct users.
    pub fn users(&self) -> impl Iterator<Item = U> + '_ {
        self.users.iter().map(|usage| usage.user)
    }

    /// Returns the first tracked user different from `user`.
    #[must_use]
    pub fn other_user(&self, user: U) -> Option<U> {
        self.users().find(|&other| other != user)
    }

    /// Adds one use by `user`.
    pub fn add_user(&mut self, user: U) {
        match self.position(user) {
            Some(i) => self.users[i].uses += 1,
            None => self.users.push(Usage { user, uses: 1 }),
        }
    }

    /// Removes one use by `user`, dropping it once its count reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownUser`] if `user` is not tracked.
    pub fn remove_user(&mut self, user: U) -> Result<(), SurfaceError> {
        let i = self.position(user).ok_or(SurfaceError::UnknownUser)?;
        self.users[i].uses -= 1;
        if self.users[i].uses == 0 {
            self.users.remove(i);
        }
        Ok(())
    }

    fn position(&self, user: U) -> Option<usize> {
        self.users.iter().position(|usage| usage.user == user)
    }
}
