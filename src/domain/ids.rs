//! Identifier newtypes with validation
//!
//! Generated sources are named after the module name and all exported C
//! symbols and struct types are prefixed with it, so it must be a valid C
//! identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module name newtype wrapper
///
/// # Examples
///
/// ```
/// use ocpgen::domain::ids::ModuleName;
/// use std::str::FromStr;
///
/// let name = ModuleName::from_str("acado").unwrap();
/// assert_eq!(name.file_name("solver", "c"), "acado_solver.c");
/// assert_eq!(name.macro_prefix(), "ACADO");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Creates a new ModuleName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ModuleName)` if the name is a valid C identifier, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Module name cannot be empty".to_string());
        }

        let mut chars = name.chars();
        let head_ok = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!(
                "Invalid module name '{name}'. Must be a C identifier ([A-Za-z_][A-Za-z0-9_]*)"
            ));
        }

        Ok(Self(name))
    }

    /// Returns the module name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased prefix of the generated struct types and include guards
    pub fn macro_prefix(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    /// `<module>_<role>.<ext>`
    pub fn file_name(&self, role: &str, ext: &str) -> String {
        format!("{}_{}.{}", self.0, role, ext)
    }

    /// Name of the shared header every generated source includes
    pub fn common_header(&self) -> String {
        self.file_name("common", "h")
    }
}

impl Default for ModuleName {
    fn default() -> Self {
        Self("acado".to_string())
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModuleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(value: ModuleName) -> Self {
        value.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
