//! Scoped environment overrides for settings tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Restores every variable it touched when dropped.
///
/// Holding the guard serializes environment access across tests in the same
/// binary.
pub struct EnvVarGuard {
    previous: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Removes every variable starting with `prefix`, then applies `changes`.
    ///
    /// A `None` value removes the variable.
    pub fn isolated(prefix: &str, changes: &[(&str, Option<&str>)]) -> Self {
        let lock = env_lock();
        let stale: Vec<String> = env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(prefix))
            .collect();
        let mut guard = Self {
            previous: Vec::with_capacity(stale.len() + changes.len()),
            _lock: lock,
        };
        for key in stale {
            guard.apply(&key, None);
        }
        for (key, value) in changes {
            guard.apply(key, *value);
        }
        guard
    }

    fn apply(&mut self, key: &str, value: Option<&str>) {
        self.previous.push((key.to_owned(), env::var(key).ok()));
        write_var(key, value);
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        while let Some((key, value)) = self.previous.pop() {
            write_var(&key, value.as_deref());
        }
    }
}

fn write_var(key: &str, value: Option<&str>) {
    unsafe {
        // SAFETY: the global mutex serializes environment mutations in tests.
        match value {
            Some(new_value) => env::set_var(key, new_value),
            None => env::remove_var(key),
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
