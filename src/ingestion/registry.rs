//! Tracks which users have an ingestion run in flight.

use super::error::IngestionError;
use super::models::IngestionState;
use crate::library_store::UserHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Default)]
pub struct RunRegistry {
    states: Arc<Mutex<HashMap<UserHandle, IngestionState>>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn states(&self) -> MutexGuard<'_, HashMap<UserHandle, IngestionState>> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// State of the latest run for `user` in this process.
    pub fn state(&self, user: UserHandle) -> IngestionState {
        self.states()
            .get(&user)
            .copied()
            .unwrap_or(IngestionState::NotStarted)
    }

    /// Marks a run as started, rejecting it if one is already in progress.
    pub fn begin(&self, user: UserHandle) -> Result<RunGuard, IngestionError> {
        let mut states = self.states();
        if states.get(&user) == Some(&IngestionState::InProgress) {
            return Err(IngestionError::AlreadyRunning(user));
        }
        states.insert(user, IngestionState::InProgress);
        Ok(RunGuard {
            registry: self.clone(),
            user,
            finished: false,
        })
    }

    fn finish(&self, user: UserHandle, state: IngestionState) {
        self.states().insert(user, state);
    }
}

/// Held for the duration of a run. Dropping it without calling
/// [`RunGuard::complete`] records the run as failed.
pub struct RunGuard {
    registry: RunRegistry,
    user: UserHandle,
    finished: bool,
}

impl RunGuard {
    pub fn complete(mut self) {
        self.finished = true;
        self.registry.finish(self.user, IngestionState::Completed);
    }

    pub fn fail(mut self) {
        self.finished = true;
        self.registry.finish(self.user, IngestionState::Failed);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.finish(self.user, IngestionState::Failed);
        }
    }
}
