use serde::{Deserialize, Serialize};

use super::invariants::{TopologyInvariantError, validate_no_overlap};
use crate::{constants::NOTARY_WORKER_TAG, identity::Identity};

/// Ordinary participants of the network. Insertion ordered; duplicates
/// collapse onto the first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Identity>", into = "Vec<Identity>")]
pub struct MemberSet {
    members: Vec<Identity>,
}

impl MemberSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Returns `false` when the identity was already a member.
    pub fn insert(&mut self, identity: Identity) -> bool {
        if self.members.contains(&identity) {
            return false;
        }
        self.members.push(identity);
        true
    }

    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.members.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Identity> for MemberSet {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        let mut set = Self::new();
        for identity in iter {
            set.insert(identity);
        }
        set
    }
}

impl From<Vec<Identity>> for MemberSet {
    fn from(members: Vec<Identity>) -> Self {
        members.into_iter().collect()
    }
}

impl From<MemberSet> for Vec<Identity> {
    fn from(set: MemberSet) -> Self {
        set.members
    }
}

#[derive(Deserialize)]
struct RawNotaryDeclaration {
    service: Identity,
    protocol_versions: Vec<u32>,
}

/// A notary service together with the protocol versions it supports.
///
/// Versions are deduplicated and keep their declaration order; the set is
/// never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNotaryDeclaration")]
pub struct NotaryDeclaration {
    service: Identity,
    protocol_versions: Vec<u32>,
}

impl NotaryDeclaration {
    #[must_use]
    pub fn new(
        service: Identity,
        protocol_version: u32,
        other_versions: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut protocol_versions = vec![protocol_version];
        for version in other_versions {
            if !protocol_versions.contains(&version) {
                protocol_versions.push(version);
            }
        }
        Self {
            service,
            protocol_versions,
        }
    }

    #[must_use]
    pub const fn service(&self) -> &Identity {
        &self.service
    }

    #[must_use]
    pub fn protocol_versions(&self) -> &[u32] {
        &self.protocol_versions
    }
}

impl TryFrom<RawNotaryDeclaration> for NotaryDeclaration {
    type Error = TopologyInvariantError;

    fn try_from(raw: RawNotaryDeclaration) -> Result<Self, Self::Error> {
        let mut versions = raw.protocol_versions.into_iter();
        let Some(first) = versions.next() else {
            return Err(TopologyInvariantError::EmptyProtocolVersions {
                service: raw.service,
            });
        };
        Ok(Self::new(raw.service, first, versions))
    }
}

/// Notary services in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NotaryDeclaration>", into = "Vec<NotaryDeclaration>")]
pub struct NotaryDeclarations {
    declarations: Vec<NotaryDeclaration>,
}

impl NotaryDeclarations {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Declare a notary service. Re-declaring a service replaces its versions
    /// but keeps its original position.
    pub fn declare(&mut self, declaration: NotaryDeclaration) {
        match self
            .declarations
            .iter_mut()
            .find(|existing| existing.service == declaration.service)
        {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotaryDeclaration> {
        self.declarations.iter()
    }

    pub fn services(&self) -> impl Iterator<Item = &Identity> {
        self.declarations.iter().map(NotaryDeclaration::service)
    }

    #[must_use]
    pub fn get(&self, service: &Identity) -> Option<&NotaryDeclaration> {
        self.declarations
            .iter()
            .find(|declaration| &declaration.service == service)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl From<Vec<NotaryDeclaration>> for NotaryDeclarations {
    fn from(declarations: Vec<NotaryDeclaration>) -> Self {
        let mut notaries = Self::new();
        for declaration in declarations {
            notaries.declare(declaration);
        }
        notaries
    }
}

impl From<NotaryDeclarations> for Vec<NotaryDeclaration> {
    fn from(notaries: NotaryDeclarations) -> Self {
        notaries.declarations
    }
}

/// Derives the worker identity that holds a notary service's signing key.
///
/// Implementations must be deterministic and injective across distinct
/// services.
pub trait WorkerNaming {
    fn worker_identity(&self, service: &Identity) -> Identity;
}

impl<F> WorkerNaming for F
where
    F: Fn(&Identity) -> Identity,
{
    fn worker_identity(&self, service: &Identity) -> Identity {
        self(service)
    }
}

/// Appends the reserved worker tag to the service's common name.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaggedWorkerNaming;

impl WorkerNaming for TaggedWorkerNaming {
    fn worker_identity(&self, service: &Identity) -> Identity {
        service.with_common_name_tag(NOTARY_WORKER_TAG)
    }
}

/// Notary services mapped to their single backing worker, in declaration
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotaryTopology {
    workers: Vec<(Identity, Identity)>,
}

impl NotaryTopology {
    #[must_use]
    pub fn worker_for(&self, service: &Identity) -> Option<&Identity> {
        self.workers
            .iter()
            .find(|(candidate, _)| candidate == service)
            .map(|(_, worker)| worker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Identity)> {
        self.workers.iter().map(|(service, worker)| (service, worker))
    }

    pub fn services(&self) -> impl Iterator<Item = &Identity> {
        self.workers.iter().map(|(service, _)| service)
    }

    pub fn workers(&self) -> impl Iterator<Item = &Identity> {
        self.workers.iter().map(|(_, worker)| worker)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

/// Derive one worker per notary service and check that no member doubles as
/// a notary service or worker.
pub fn resolve_notary_topology(
    members: &MemberSet,
    notaries: &NotaryDeclarations,
    naming: &dyn WorkerNaming,
) -> Result<NotaryTopology, TopologyInvariantError> {
    if notaries.is_empty() {
        return Ok(NotaryTopology::default());
    }

    let workers: Vec<(Identity, Identity)> = notaries
        .services()
        .map(|service| (service.clone(), naming.worker_identity(service)))
        .collect();

    validate_no_overlap(
        members.iter(),
        workers
            .iter()
            .flat_map(|(service, worker)| [service, worker]),
    )?;

    for (index, (_, worker)) in workers.iter().enumerate() {
        let collides = notaries.get(worker).is_some()
            || workers[..index].iter().any(|(_, earlier)| earlier == worker);
        if collides {
            return Err(TopologyInvariantError::NotaryWorkerCollision {
                worker: worker.clone(),
            });
        }
    }

    Ok(NotaryTopology { workers })
}
