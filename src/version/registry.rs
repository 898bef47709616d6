//! Registry of versioned implementations
//!
//! Each [`DispatchKey`] owns an ordered list of `(criteria, implementation)`
//! pairs. Registration only ever appends; resolution walks the list from the
//! back so the most recently registered matching implementation wins.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::version::criteria::Criteria;
use crate::version::error::CheckError;
use crate::version::loose::Version;

/// Identity of a logical callable: the declaring scope plus its simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DispatchKey {
    pub scope: String,
    pub name: String,
}

impl DispatchKey {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// Split `a::b::c` into scope `a::b` and name `c`.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once("::") {
            Some((scope, name)) => Self::new(scope, name),
            None => Self::new("", path),
        }
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.scope, self.name)
        }
    }
}

/// Build a [`DispatchKey`] scoped to the calling module.
///
/// ```
/// use versioncheck::dispatch_key;
///
/// let key = dispatch_key!(Volume::create);
/// assert_eq!(key.name, "create");
/// assert!(key.scope.ends_with("::Volume"));
/// ```
#[macro_export]
macro_rules! dispatch_key {
    ($name:ident) => {
        $crate::version::registry::DispatchKey::new(module_path!(), stringify!($name))
    };
    ($ty:ident :: $name:ident) => {
        $crate::version::registry::DispatchKey::new(
            concat!(module_path!(), "::", stringify!($ty)),
            stringify!($name),
        )
    };
}

/// A single registered implementation and the criteria guarding it.
#[derive(Debug, Clone)]
pub struct VersionedFunc<I> {
    pub criteria: Criteria,
    pub implementation: I,
}

impl<I> VersionedFunc<I> {
    pub fn supports(&self, version: Option<&Version>) -> bool {
        self.criteria.test_version(version)
    }
}

/// Override table shared by every dispatcher built on it.
///
/// Populate it during startup, then share it through an `Arc`. Mutation is
/// serialized by a lock, but the relative order of registrations racing on
/// the same key is whatever order they take the lock in.
pub struct Registry<I> {
    funcs: RwLock<IndexMap<DispatchKey, Vec<VersionedFunc<I>>>>,
}

impl<I> Default for Registry<I> {
    fn default() -> Self {
        Self {
            funcs: RwLock::new(IndexMap::new()),
        }
    }
}

impl<I: Clone> Registry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an implementation under `key`. Overlapping criteria are allowed.
    pub fn register(&self, key: DispatchKey, criteria: Criteria, implementation: I) {
        debug!("Registering {} for {}", key, criteria);
        let mut funcs = self.funcs.write().unwrap_or_else(PoisonError::into_inner);
        funcs.entry(key).or_default().push(VersionedFunc {
            criteria,
            implementation,
        });
    }

    /// Find the implementation for `version`: the last registered one whose
    /// criteria is satisfied.
    pub fn resolve(&self, key: &DispatchKey, version: Option<&str>) -> Result<I, CheckError> {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        let Some(candidates) = funcs.get(key) else {
            return Err(CheckError::NotRegistered { key: key.clone() });
        };

        let parsed = version.map(Version::parse);
        let found = candidates
            .iter()
            .enumerate()
            .rev()
            .find(|(_, func)| func.supports(parsed.as_ref()));

        match found {
            Some((index, func)) => {
                debug!(
                    "Resolved {} for version {:?} to candidate #{} ({})",
                    key, version, index, func.criteria
                );
                Ok(func.implementation.clone())
            }
            None => Err(CheckError::VersionNotSupport {
                target: key.to_string(),
                version: version.map(str::to_string),
            }),
        }
    }

    /// Number of implementations registered under `key`
    pub fn candidates(&self, key: &DispatchKey) -> usize {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        funcs.get(key).map_or(0, Vec::len)
    }

    /// Criteria registered under `key`, in registration order
    pub fn criteria(&self, key: &DispatchKey) -> Vec<Criteria> {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        funcs
            .get(key)
            .map(|list| list.iter().map(|f| f.criteria.clone()).collect())
            .unwrap_or_default()
    }

    /// All keys, in the order they were first registered
    pub fn keys(&self) -> Vec<DispatchKey> {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        funcs.keys().cloned().collect()
    }
}

impl<I> fmt::Debug for Registry<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let funcs = self.funcs.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_map()
            .entries(funcs.iter().map(|(k, v)| (k.to_string(), v.len())))
            .finish()
    }
}
