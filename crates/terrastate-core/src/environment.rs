//! Validated environment names.
//!
//! An [`Environment`] names one independently tracked scope of
//! infrastructure (`prod`, `staging`, ...). The name becomes part of a file
//! name inside the storage directory, so it is checked once at the edge and
//! carried as a newtype afterwards.

use std::fmt;

use crate::error::CoreError;

/// Longest accepted name, in bytes. Most filesystems cap a file name at 255
/// bytes and the stored files add a suffix, so this leaves headroom.
pub const MAX_ENVIRONMENT_NAME_LEN: usize = 200;

/// A name that is safe to use as a file-name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Environment(String);

impl Environment {
    /// Validates `name` as an environment name.
    ///
    /// Rejects empty names, names containing `/`, `\` or NUL, and any name
    /// containing `..`.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let reject = |reason| {
            Err(CoreError::InvalidEnvironmentName {
                name: name.to_string(),
                reason,
            })
        };

        if name.is_empty() {
            return reject("name is empty");
        }
        if name.len() > MAX_ENVIRONMENT_NAME_LEN {
            return reject("name is too long");
        }
        if name.contains(['/', '\\']) {
            return reject("name contains a path separator");
        }
        if name.contains('\0') {
            return reject("name contains a NUL byte");
        }
        if name == "." || name.contains("..") {
            return reject("name refers to a parent or current directory");
        }
        Ok(Environment(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["prod", "staging", "us-east-1.staging", "team_a", "v1.2"] {
            let env = Environment::parse(name).unwrap();
            assert_eq!(env.as_str(), name);
            assert_eq!(env.to_string(), name);
        }
    }

    #[test]
    fn rejects_escaping_names() {
        for name in ["", ".", "..", "../etc", "a/b", "/abs", "a\\b", "x..y", "nul\0byte"] {
            assert!(
                matches!(
                    Environment::parse(name),
                    Err(CoreError::InvalidEnvironmentName { .. })
                ),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "a".repeat(MAX_ENVIRONMENT_NAME_LEN + 1);
        assert!(Environment::parse(&name).is_err());
        assert!(Environment::parse(&name[1..]).is_ok());
    }

    proptest! {
        #[test]
        fn names_with_a_separator_are_rejected(
            prefix in "[a-z0-9]{0,12}",
            sep in prop::sample::select(vec!["/", "\\", ".."]),
            suffix in "[a-z0-9]{0,12}",
        ) {
            let name = format!("{prefix}{sep}{suffix}");
            prop_assert!(Environment::parse(&name).is_err());
        }

        #[test]
        fn plain_names_are_accepted(name in "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,40}") {
            prop_assume!(!name.contains(".."));
            prop_assert!(Environment::parse(&name).is_ok());
        }
    }
}
