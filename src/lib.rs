//! Guard and overload callables by the version of an external subject.
//!
//! ```
//! use std::sync::Arc;
//! use versioncheck::{Gate, MemberKind, Method, Registry, dispatch_key};
//!
//! struct Api {
//!     version: String,
//! }
//!
//! fn api_version(_: MemberKind, api: &Api, _: &()) -> Option<String> {
//!     Some(api.version.clone())
//! }
//!
//! let registry: Arc<Registry<Method<Api, (), &'static str>>> = Arc::new(Registry::new());
//! let key = dispatch_key!(Api::list);
//!
//! Gate::new(">2", api_version)?.register(&registry, key.clone(), |_, ()| "paged");
//! let list = Gate::new("<2", api_version)?.register(&registry, key, |_, ()| "flat");
//!
//! assert_eq!(list.call(&Api { version: "3".into() }, ())?, "paged");
//! assert_eq!(list.call(&Api { version: "1".into() }, ())?, "flat");
//! assert!(list.call(&Api { version: "2".into() }, ()).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod version;

pub use version::class_gate::{ClassGate, ClassGateBuilder, TypeSubject};
pub use version::criteria::Criteria;
pub use version::error::{CheckError, CriteriaError};
pub use version::gate::{Dispatcher, Gate, MemberKind, Method, VersionGetter};
pub use version::loose::{Field, Version};
pub use version::operator::Operator;
pub use version::registry::{DispatchKey, Registry, VersionedFunc};
