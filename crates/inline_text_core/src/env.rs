//! Environment access helpers shared by configuration loading and tests.

use std::sync::{Mutex, OnceLock};

/// Process-wide lock that serializes environment mutation in tests.
///
/// # Returns
/// A static mutex; hold its guard while an [`EnvGuard`] is alive.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Read a variable, treating missing, non-unicode, and whitespace-only values alike.
///
/// # Arguments
/// - `key`: Environment variable name.
///
/// # Returns
/// The trimmed value, or `None` when there is nothing usable.
pub fn read_trimmed(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock()` while tests mutate the environment.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Overrides one environment variable and puts the old value back on drop.
#[derive(Debug)]
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` for the lifetime of the guard.
    ///
    /// # Arguments
    /// - `key`: Environment variable name.
    /// - `value`: Value to set.
    ///
    /// # Returns
    /// A guard restoring the previous value on drop.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, Some(value));
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Unset `key` for the lifetime of the guard.
    ///
    /// # Returns
    /// A guard restoring the previous value on drop.
    pub fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, None);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_var(&self.key, self.previous.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::{env_lock, read_trimmed, EnvGuard};

    #[test]
    fn guard_restores_previous_value() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "INLINE_TEXT_TEST_GUARD_RESTORE";
        let _baseline = EnvGuard::set(key, "before");
        {
            let _override = EnvGuard::set(key, "after");
            assert_eq!(read_trimmed(key).as_deref(), Some("after"));
        }
        assert_eq!(read_trimmed(key).as_deref(), Some("before"));
    }

    #[test]
    fn read_trimmed_drops_blank_values() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "INLINE_TEXT_TEST_GUARD_BLANK";
        let _blank = EnvGuard::set(key, "   ");
        assert_eq!(read_trimmed(key), None);
        drop(_blank);
        let _removed = EnvGuard::remove(key);
        assert_eq!(read_trimmed(key), None);
    }
}
