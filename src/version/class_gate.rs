//! Version gates for whole types
//!
//! A [`ClassGate`] guards the constructor and associated functions of one
//! type with a single criteria. Members opt in explicitly through
//! [`ClassGateBuilder`]; anything not declared there is not guarded, which
//! includes ordinary methods (gate those with [`Gate::register`] instead).
//!
//! A member declared on a type's gate may delegate to a body defined
//! elsewhere, e.g. on a "base" type. The check still runs against the gated
//! type, so the same body can be allowed through one type and rejected
//! through another.

use std::any::{TypeId, type_name};
use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::version::error::CheckError;
use crate::version::gate::{Gate, MemberKind, VersionGetter};

/// Identity of a gated type, handed to the version getter as subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSubject {
    name: &'static str,
    id: TypeId,
}

impl TypeSubject {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path; generic arguments are kept as written
    pub fn short_name(&self) -> &'static str {
        let path_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..path_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declares which members of a type are guarded
pub struct ClassGateBuilder<G> {
    gate: Gate<G>,
    subject: TypeSubject,
    members: IndexMap<String, MemberKind>,
}

impl<G> ClassGateBuilder<G> {
    fn member(mut self, name: &str, kind: MemberKind) -> Self {
        self.members.insert(name.to_string(), kind);
        self
    }

    /// Guard a constructor
    pub fn init(self, name: &str) -> Self {
        self.member(name, MemberKind::Init)
    }

    /// Guard an associated function that receives the type as context
    pub fn class_method(self, name: &str) -> Self {
        self.member(name, MemberKind::ClassMethod)
    }

    /// Guard an associated function without context
    pub fn static_method(self, name: &str) -> Self {
        self.member(name, MemberKind::StaticMethod)
    }

    pub fn build(self) -> ClassGate<G> {
        debug!(
            "Gating {} members of {} with {}",
            self.members.len(),
            self.subject,
            self.gate.criteria()
        );
        ClassGate {
            gate: self.gate,
            subject: self.subject,
            members: self.members,
        }
    }
}

/// One criteria guarding the declared members of a type
pub struct ClassGate<G> {
    gate: Gate<G>,
    subject: TypeSubject,
    members: IndexMap<String, MemberKind>,
}

impl<G> ClassGate<G> {
    pub fn builder<T: ?Sized + 'static>(gate: Gate<G>) -> ClassGateBuilder<G> {
        ClassGateBuilder {
            gate,
            subject: TypeSubject::of::<T>(),
            members: IndexMap::new(),
        }
    }

    pub fn subject(&self) -> TypeSubject {
        self.subject
    }

    pub fn gate(&self) -> &Gate<G> {
        &self.gate
    }

    /// Kind a member was declared with, `None` if it is not guarded
    pub fn kind_of(&self, member: &str) -> Option<MemberKind> {
        self.members.get(member).copied()
    }

    /// Run `body` if the current version satisfies the type's criteria.
    ///
    /// The getter is asked with the member's declared kind and the gated
    /// type as subject. On rejection `body` is never called.
    pub fn invoke<A, R>(
        &self,
        member: &str,
        args: A,
        body: impl FnOnce(A) -> R,
    ) -> Result<R, CheckError>
    where
        G: VersionGetter<TypeSubject, A>,
    {
        let Some(kind) = self.kind_of(member) else {
            return Err(CheckError::UnguardedMember {
                subject: self.subject.name,
                member: member.to_string(),
            });
        };

        let target = format!("{}::{}", self.subject.short_name(), member);
        self.gate.check(kind, &target, &self.subject, &args)?;
        Ok(body(args))
    }
}

impl<G> fmt::Debug for ClassGate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassGate")
            .field("subject", &self.subject.name)
            .field("criteria", &self.gate.criteria().to_string())
            .field("members", &self.members)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use rstest::rstest;

    struct Volume;
    struct Snapshot;
    struct Wrapper<T>(T);

    mock! {
        Getter {}
        impl VersionGetter<TypeSubject, String> for Getter {
            fn get_version(&self, kind: MemberKind, subject: &TypeSubject, args: &String) -> Option<String>;
        }
    }

    fn volume_gate(getter: MockGetter) -> ClassGate<MockGetter> {
        ClassGate::builder::<Volume>(Gate::new(">3.0", getter).unwrap())
            .init("new")
            .class_method("from_config")
            .static_method("validate_name")
            .build()
    }

    #[rstest]
    #[case("new", MemberKind::Init)]
    #[case("from_config", MemberKind::ClassMethod)]
    #[case("validate_name", MemberKind::StaticMethod)]
    fn invoke_passes_declared_kind_and_subject(#[case] member: &str, #[case] kind: MemberKind) {
        let mut getter = MockGetter::new();
        getter
            .expect_get_version()
            .withf(move |k, subject, args| {
                *k == kind && subject.is::<Volume>() && args == "vol-1"
            })
            .times(1)
            .return_const(Some("4".to_string()));
        let gate = volume_gate(getter);

        let result = gate.invoke(member, "vol-1".to_string(), |name| name.len());

        assert_eq!(result, Ok(5));
    }

    #[test]
    fn invoke_rejects_without_calling_body() {
        let mut getter = MockGetter::new();
        getter
            .expect_get_version()
            .return_const(Some("3.0".to_string()));
        let gate = volume_gate(getter);

        let result = gate.invoke("new", "vol-1".to_string(), |_| -> () {
            panic!("body must not run");
        });

        assert_eq!(
            result,
            Err(CheckError::VersionNotSupport {
                target: "Volume::new".to_string(),
                version: Some("3.0".to_string()),
            })
        );
    }

    #[test]
    fn invoke_with_unknown_version_is_allowed() {
        let mut getter = MockGetter::new();
        getter.expect_get_version().return_const(None::<String>);
        let gate = volume_gate(getter);

        assert_eq!(gate.invoke("from_config", String::new(), |_| "ok"), Ok("ok"));
    }

    #[test]
    fn undeclared_member_is_not_guarded() {
        let mut getter = MockGetter::new();
        getter.expect_get_version().never();
        let gate = volume_gate(getter);

        let result = gate.invoke("resize", String::new(), |_| ());

        assert_eq!(
            result,
            Err(CheckError::UnguardedMember {
                subject: type_name::<Volume>(),
                member: "resize".to_string(),
            })
        );
        assert_eq!(gate.kind_of("resize"), None);
    }

    #[test]
    fn short_name_keeps_generic_arguments_intact() {
        let subject = TypeSubject::of::<Wrapper<Snapshot>>();

        assert!(subject.short_name().starts_with("Wrapper<"));
        assert!(subject.short_name().ends_with("::Snapshot>"));
        assert_eq!(TypeSubject::of::<u32>().short_name(), "u32");
    }

    #[test]
    fn rejection_target_names_generic_type() {
        let mut getter = MockGetter::new();
        getter.expect_get_version().return_const(Some("1".to_string()));
        let gate = ClassGate::builder::<Wrapper<Volume>>(Gate::new(">3.0", getter).unwrap())
            .init("new")
            .build();

        let Err(CheckError::VersionNotSupport { target, .. }) =
            gate.invoke("new", String::new(), |_| ())
        else {
            panic!("expected VersionNotSupport");
        };

        assert!(target.starts_with("Wrapper<"));
        assert!(target.ends_with("::Volume>::new"));
    }

    #[test]
    fn subject_identifies_the_gated_type() {
        let subject = TypeSubject::of::<Snapshot>();

        assert!(subject.is::<Snapshot>());
        assert!(!subject.is::<Volume>());
        assert_eq!(subject.short_name(), "Snapshot");
        assert!(subject.name().ends_with("::Snapshot"));
    }
}
