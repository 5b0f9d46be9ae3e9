#![allow(dead_code)]

pub mod fixtures;

use std::sync::Mutex;

/// Serializes tests that touch process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set (`Some`) or removed (`None`),
/// restoring the previous values afterwards, even on panic.
pub fn with_scoped_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(vars);
    f()
}

struct EnvRestore {
    previous: Vec<(String, Option<String>)>,
}

impl EnvRestore {
    fn apply(vars: &[(&str, Option<&str>)]) -> Self {
        let previous = vars
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect();
        for (key, value) in vars {
            set_or_remove(key, *value);
        }
        Self { previous }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        // Reverse order so a key listed twice ends at its original value.
        for (key, value) in self.previous.iter().rev() {
            set_or_remove(key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}
