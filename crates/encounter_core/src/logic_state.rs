//! Run-scoped blackboard shared by pipeline steps.
//!
//! Steps publish intermediate results under typed [`StateKey`]s so a consumer
//! and its producer agree on the value type at compile time. A key that has
//! not been published yet reads as `None`; that is "not yet available", never
//! an error.
//!
//! # Example
//!
//! ```
//! use encounter_core::logic_state::{LogicState, StateKey};
//!
//! const SCORE: StateKey<u32> = StateKey::new("Score");
//!
//! let mut state = LogicState::new();
//! assert!(state.get(&SCORE).is_none());
//! state.set(&SCORE, 7).unwrap();
//! assert_eq!(state.get(&SCORE), Some(&7));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::error::{EncounterError, Result};

/// Name and value type of one blackboard entry.
pub struct StateKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Declare a key.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self.name)
    }
}

/// Blackboard for one encounter build.
#[derive(Default)]
pub struct LogicState {
    values: HashMap<&'static str, Box<dyn Any>>,
}

impl LogicState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value. Each key may be set once per run.
    pub fn set<T: Any>(&mut self, key: &StateKey<T>, value: T) -> Result<()> {
        if self.values.contains_key(key.name) {
            return Err(EncounterError::StateKeyAlreadySet(key.name));
        }
        self.values.insert(key.name, Box::new(value));
        Ok(())
    }

    /// Read a value, or `None` if it has not been published.
    ///
    /// A value stored under the same name with a different type also reads as `None`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &StateKey<T>) -> Option<&T> {
        self.values
            .get(key.name)
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Whether anything has been published under this key's name.
    #[must_use]
    pub fn contains<T>(&self, key: &StateKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    /// Number of published keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value, ready for a fresh run.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Debug for LogicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort_unstable();
        f.debug_struct("LogicState").field("keys", &keys).finish()
    }
}
