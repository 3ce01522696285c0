//! Compiler options, optionally read from an `ifjc.toml` file.

use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::CompileError;
use crate::symtable::DEFAULT_SCOPE_CAPACITY;

/// Smallest accepted per-scope capacity.
pub const MIN_SCOPE_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Reject variables that are never read, or `var`s never reassigned.
    pub check_unused: bool,
    /// Slots per scope hashtable; must be prime.
    pub scope_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { check_unused: true, scope_capacity: DEFAULT_SCOPE_CAPACITY }
    }
}

impl Options {
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::config(format!("cannot read config file: {e}"), path.to_path_buf()))?;
        Self::from_toml(&content, path)
    }

    pub fn from_toml(content: &str, path: &Path) -> Result<Self, CompileError> {
        let options: Options = toml::from_str(content)
            .map_err(|e| CompileError::config(format!("invalid config: {}", e.message()), path.to_path_buf()))?;
        options.validate(path)?;
        Ok(options)
    }

    pub fn validate(&self, path: &Path) -> Result<(), CompileError> {
        if self.scope_capacity < MIN_SCOPE_CAPACITY || !is_prime(self.scope_capacity) {
            return Err(CompileError::config(
                format!(
                    "scope_capacity must be a prime of at least {MIN_SCOPE_CAPACITY}, got {}",
                    self.scope_capacity
                ),
                path.to_path_buf(),
            ));
        }
        Ok(())
    }
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}
