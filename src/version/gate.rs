//! Version gates for callables
//!
//! A [`Gate`] pairs a parsed [`Criteria`] with a [`VersionGetter`]. Registering
//! an implementation through a gate yields a [`Dispatcher`]; every dispatcher
//! sharing a key dispatches across all implementations registered under it.
//!
//! ```text
//! call ──▶ getter(Method, subject, args) ──▶ registry.resolve(key, version)
//!                                                 │
//!                               ┌─────────────────┴──────────────┐
//!                               ▼                                ▼
//!                        implementation(args)          Err(VersionNotSupport)
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::version::criteria::Criteria;
use crate::version::error::{CheckError, CriteriaError};
use crate::version::registry::{DispatchKey, Registry};

/// Which kind of member a guarded call goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Constructor of a gated type
    Init,
    /// Associated function taking the type as context
    ClassMethod,
    /// Associated function without context
    StaticMethod,
    /// Any callable registered in function mode
    Method,
}

/// Supplies the current version for a guarded call.
///
/// `subject` is the receiver (or `()` for free functions, or the gated
/// type's [`TypeSubject`](crate::version::class_gate::TypeSubject)), `args` the
/// remaining call arguments. Returning `None` means the version is unknown,
/// which every criteria accepts.
pub trait VersionGetter<S, A> {
    fn get_version(&self, kind: MemberKind, subject: &S, args: &A) -> Option<String>;
}

impl<S, A, F> VersionGetter<S, A> for F
where
    F: Fn(MemberKind, &S, &A) -> Option<String>,
{
    fn get_version(&self, kind: MemberKind, subject: &S, args: &A) -> Option<String> {
        self(kind, subject, args)
    }
}

/// Implementation type stored in a dispatching registry
pub type Method<S, A, R> = Arc<dyn Fn(&S, A) -> R + Send + Sync>;

/// A criteria plus the getter used to evaluate it
pub struct Gate<G> {
    criteria: Criteria,
    getter: Arc<G>,
}

impl<G> Gate<G> {
    /// Parse `expr` up front; a malformed expression never reaches call time.
    pub fn new(expr: &str, getter: G) -> Result<Self, CriteriaError> {
        Ok(Self {
            criteria: Criteria::parse(expr)?,
            getter: Arc::new(getter),
        })
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn getter(&self) -> &G {
        &self.getter
    }

    /// Ask the getter for a version and test it against this gate's criteria.
    ///
    /// `target` names the guarded member in the error.
    pub fn check<S, A>(
        &self,
        kind: MemberKind,
        target: &str,
        subject: &S,
        args: &A,
    ) -> Result<(), CheckError>
    where
        G: VersionGetter<S, A>,
    {
        let version = self.getter.get_version(kind, subject, args);
        if self.criteria.test(version.as_deref()) {
            return Ok(());
        }

        warn!(
            "Rejected {:?} call to {}: version {:?} does not satisfy {}",
            kind, target, version, self.criteria
        );
        Err(CheckError::VersionNotSupport {
            target: target.to_string(),
            version,
        })
    }

    /// Register `implementation` under `key` and return a dispatcher for it.
    pub fn register<S, A, R, F>(
        &self,
        registry: &Arc<Registry<Method<S, A, R>>>,
        key: DispatchKey,
        implementation: F,
    ) -> Dispatcher<S, A, R, G>
    where
        F: Fn(&S, A) -> R + Send + Sync + 'static,
        G: VersionGetter<S, A>,
    {
        registry.register(key.clone(), self.criteria.clone(), Arc::new(implementation));
        Dispatcher {
            key,
            registry: Arc::clone(registry),
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<G> Clone for Gate<G> {
    fn clone(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<G> fmt::Debug for Gate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("criteria", &self.criteria.to_string())
            .finish_non_exhaustive()
    }
}

/// Calls whichever implementation under its key fits the current version
pub struct Dispatcher<S, A, R, G> {
    key: DispatchKey,
    registry: Arc<Registry<Method<S, A, R>>>,
    getter: Arc<G>,
}

impl<S, A, R, G> Dispatcher<S, A, R, G>
where
    G: VersionGetter<S, A>,
{
    /// Query the version, resolve an implementation, invoke it.
    ///
    /// The getter always sees [`MemberKind::Method`], whatever `subject` is.
    pub fn call(&self, subject: &S, args: A) -> Result<R, CheckError> {
        let version = self.getter.get_version(MemberKind::Method, subject, &args);
        let implementation = self
            .registry
            .resolve(&self.key, version.as_deref())
            .inspect_err(|e| warn!("Dispatch of {} failed: {}", self.key, e))?;
        Ok(implementation(subject, args))
    }

    pub fn key(&self) -> &DispatchKey {
        &self.key
    }
}

impl<S, A, R, G> Clone for Dispatcher<S, A, R, G> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            registry: Arc::clone(&self.registry),
            getter: Arc::clone(&self.getter),
        }
    }
}
