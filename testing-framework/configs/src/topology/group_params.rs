use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::notary::{NotaryDeclarations, NotaryTopology};
use crate::{
    constants::{NON_VALIDATING_NOTARY_PROTOCOL, NOTARY_SERVICE_KEY_PREFIX},
    identity::Identity,
    keys::{KeyMaterialError, KeyPairs, PublicKey, SchemeRegistry},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupParametersError {
    #[error("notary worker '{worker}' has no generated key")]
    MissingWorkerKey { worker: Identity },
    #[error("notary service '{service}' has no worker")]
    MissingWorker { service: Identity },
    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupParameterEntry {
    key: String,
    value: String,
}

impl GroupParameterEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for GroupParameterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered group parameter entries describing the network's notary
/// services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupParameters {
    entries: Vec<GroupParameterEntry>,
}

impl GroupParameters {
    pub fn iter(&self) -> impl Iterator<Item = &GroupParameterEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(GroupParameterEntry::key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(GroupParameterEntry::value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a GroupParameters {
    type Item = &'a GroupParameterEntry;
    type IntoIter = std::slice::Iter<'a, GroupParameterEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Accumulates entries for one notary service at a time; the service index
/// advances once per service, not per entry.
struct GroupParametersBuilder<'a> {
    registry: &'a SchemeRegistry,
    entries: Vec<GroupParameterEntry>,
    notary_index: usize,
}

impl<'a> GroupParametersBuilder<'a> {
    const fn new(registry: &'a SchemeRegistry) -> Self {
        Self {
            registry,
            entries: Vec::new(),
            notary_index: 0,
        }
    }

    fn service_key(&self, suffix: &str) -> String {
        format!("{NOTARY_SERVICE_KEY_PREFIX}.{}.{suffix}", self.notary_index)
    }

    fn push_service_name(&mut self, service: &Identity) {
        let key = self.service_key("name");
        self.entries.push(GroupParameterEntry::new(key, service.to_string()));
    }

    fn push_service_key(&mut self, worker_key: &PublicKey) -> Result<(), KeyMaterialError> {
        let key = self.service_key("keys.0");
        let encoded = self.registry.encode_public_key(worker_key)?;
        self.entries.push(GroupParameterEntry::new(key, encoded));
        Ok(())
    }

    fn push_protocol(&mut self, protocol_versions: &[u32]) {
        let key = self.service_key("flow.protocol.name");
        self.entries
            .push(GroupParameterEntry::new(key, NON_VALIDATING_NOTARY_PROTOCOL));

        for (index, version) in protocol_versions.iter().enumerate() {
            let key = self.service_key(&format!("flow.protocol.version.{index}"));
            self.entries.push(GroupParameterEntry::new(key, version.to_string()));
        }
    }

    fn finish(self) -> GroupParameters {
        GroupParameters {
            entries: self.entries,
        }
    }
}

/// Encode every declared notary service, in declaration order, as group
/// parameter entries. Only the non-validating protocol is advertised.
pub fn encode_group_parameters(
    registry: &SchemeRegistry,
    notaries: &NotaryDeclarations,
    topology: &NotaryTopology,
    worker_keys: &KeyPairs,
) -> Result<GroupParameters, GroupParametersError> {
    let mut builder = GroupParametersBuilder::new(registry);

    for declaration in notaries.iter() {
        let service = declaration.service();
        let worker = topology
            .worker_for(service)
            .ok_or_else(|| GroupParametersError::MissingWorker {
                service: service.clone(),
            })?;
        let worker_key = worker_keys
            .get(worker)
            .ok_or_else(|| GroupParametersError::MissingWorkerKey {
                worker: worker.clone(),
            })?;

        builder.push_service_name(service);
        builder.push_service_key(worker_key.public())?;
        builder.push_protocol(declaration.protocol_versions());
        debug!(
            index = builder.notary_index,
            %service,
            %worker,
            versions = ?declaration.protocol_versions(),
            "encoded notary service"
        );

        builder.notary_index += 1;
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{
        keys::{DEFAULT_SCHEME_NAME, KeyProvisioner},
        topology::notary::{
            MemberSet, NotaryDeclaration, TaggedWorkerNaming, WorkerNaming as _,
            resolve_notary_topology,
        },
    };

    fn identity(raw: &str) -> Identity {
        raw.parse().unwrap()
    }

    fn encode(notaries: &NotaryDeclarations, seed: u64) -> (GroupParameters, KeyPairs) {
        let registry = SchemeRegistry::platform();
        let scheme = registry.find_scheme(DEFAULT_SCHEME_NAME).unwrap();
        let topology =
            resolve_notary_topology(&MemberSet::new(), notaries, &TaggedWorkerNaming).unwrap();
        let worker_keys = KeyProvisioner::new(scheme, StdRng::seed_from_u64(seed))
            .unwrap()
            .generate_key_pairs(topology.workers());

        let params = encode_group_parameters(&registry, notaries, &topology, &worker_keys).unwrap();
        (params, worker_keys)
    }

    #[test]
    fn single_service_encodes_in_fixed_order() {
        let service = identity("CN=Notary, O=Notary Service, L=Zurich, C=CH");
        let notaries: NotaryDeclarations =
            vec![NotaryDeclaration::new(service.clone(), 1, [2])].into();

        let (params, worker_keys) = encode(&notaries, 1);
        let worker = TaggedWorkerNaming.worker_identity(&service);
        let encoded_key = worker_keys.get(&worker).unwrap().public().to_pem().unwrap();

        let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                format!("service.0.name={service}"),
                format!("service.0.keys.0={encoded_key}"),
                "service.0.flow.protocol.name=com.r3.corda.notary.plugin.nonvalidating".to_owned(),
                "service.0.flow.protocol.version.0=1".to_owned(),
                "service.0.flow.protocol.version.1=2".to_owned(),
            ]
        );
    }

    #[test]
    fn index_advances_per_service() {
        let first = identity("CN=First, O=Notary Service, L=Zurich, C=CH");
        let second = identity("CN=Second, O=Notary Service, L=Zurich, C=CH");
        let notaries: NotaryDeclarations = vec![
            NotaryDeclaration::new(first.clone(), 1, [2, 3]),
            NotaryDeclaration::new(second.clone(), 4, []),
        ]
        .into();

        let (params, _) = encode(&notaries, 2);

        assert_eq!(params.len(), 6 + 4);
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec![
                "service.0.name",
                "service.0.keys.0",
                "service.0.flow.protocol.name",
                "service.0.flow.protocol.version.0",
                "service.0.flow.protocol.version.1",
                "service.0.flow.protocol.version.2",
                "service.1.name",
                "service.1.keys.0",
                "service.1.flow.protocol.name",
                "service.1.flow.protocol.version.0",
            ]
        );
        assert_eq!(params.get("service.0.name"), Some(first.to_string().as_str()));
        assert_eq!(params.get("service.1.name"), Some(second.to_string().as_str()));
        assert_eq!(params.get("service.0.flow.protocol.version.2"), Some("3"));
        assert_eq!(params.get("service.1.flow.protocol.version.0"), Some("4"));
        assert_eq!(params.get("service.1.flow.protocol.version.1"), None);
    }

    #[test]
    fn fresh_keys_only_change_key_values() {
        let notaries: NotaryDeclarations = vec![NotaryDeclaration::new(
            identity("CN=Notary, O=Notary Service, L=Zurich, C=CH"),
            1,
            [],
        )]
        .into();

        let (first, _) = encode(&notaries, 10);
        let (second, _) = encode(&notaries, 20);

        assert!(first.keys().eq(second.keys()));
        for (a, b) in first.iter().zip(second.iter()) {
            if a.key().ends_with(".keys.0") {
                assert_ne!(a.value(), b.value());
            } else {
                assert_eq!(a.value(), b.value());
            }
        }
    }

    #[test]
    fn missing_worker_key_is_reported() {
        let service = identity("CN=Notary, O=Notary Service, L=Zurich, C=CH");
        let notaries: NotaryDeclarations =
            vec![NotaryDeclaration::new(service.clone(), 1, [])].into();
        let topology =
            resolve_notary_topology(&MemberSet::new(), &notaries, &TaggedWorkerNaming).unwrap();

        let err = encode_group_parameters(
            &SchemeRegistry::platform(),
            &notaries,
            &topology,
            &KeyPairs::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            GroupParametersError::MissingWorkerKey {
                worker: TaggedWorkerNaming.worker_identity(&service)
            }
        );
    }
}
