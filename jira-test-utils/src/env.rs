//! Environment variable management for testing
//!
//! Tests that read configuration from the environment must not leak values
//! into each other, so every override goes through a guard that restores the
//! original value when dropped.

use std::env;

/// RAII guard for a single environment variable
///
/// The original value (or its absence) is captured on creation and put back
/// when the guard is dropped.
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
}

impl EnvVarGuard {
  /// Capture the current value of `name`
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      original: env::var(name).ok(),
    }
  }

  /// Set the variable for the lifetime of the guard
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  /// Remove the variable for the lifetime of the guard
  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.name);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}
