//! Condition outcomes.
//!
//! A condition is any `FnMut() -> Result<Outcome<T>, E>`. `Ok(NotYetSatisfied)`
//! is retryable; `Err(_)` means evaluation itself failed and is never retried.

/// Result of a single condition evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The awaited state has not appeared yet.
    NotYetSatisfied,
    /// The awaited state holds; carries the observed value.
    Satisfied(T),
}

impl<T> Outcome<T> {
    /// Returns true for `Satisfied`.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Outcome::Satisfied(_))
    }

    /// Maps the satisfied value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Satisfied(value) => Outcome::Satisfied(f(value)),
            Outcome::NotYetSatisfied => Outcome::NotYetSatisfied,
        }
    }

    /// Chains a nested lookup; the composite is unsatisfied if either step is.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Satisfied(value) => f(value),
            Outcome::NotYetSatisfied => Outcome::NotYetSatisfied,
        }
    }

    /// Converts to an `Option`, dropping the distinction between the variants' names.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Satisfied(value) => Some(value),
            Outcome::NotYetSatisfied => None,
        }
    }
}

impl Outcome<()> {
    /// Outcome of a plain boolean predicate.
    pub fn when(satisfied: bool) -> Self {
        if satisfied {
            Outcome::Satisfied(())
        } else {
            Outcome::NotYetSatisfied
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Satisfied(v),
            None => Outcome::NotYetSatisfied,
        }
    }
}
