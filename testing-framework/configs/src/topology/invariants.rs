use std::collections::HashSet;

use thiserror::Error;

use crate::{constants::NOTARY_WORKER_TAG, identity::Identity};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyInvariantError {
    #[error("common name '{common_name}' should not contain {}", NOTARY_WORKER_TAG)]
    InvalidIdentity { common_name: String },
    #[error("member(s) [{}] cannot also be a notary", join(.overlap))]
    MemberNotaryOverlap { overlap: Vec<Identity> },
    #[error("notary worker '{worker}' collides with another notary identity")]
    NotaryWorkerCollision { worker: Identity },
    #[error("notary '{service}' declares no protocol versions")]
    EmptyProtocolVersions { service: Identity },
}

fn join(identities: &[Identity]) -> String {
    identities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reject identities whose common name carries the reserved notary worker
/// marker.
pub fn validate_identity(identity: &Identity) -> Result<(), TopologyInvariantError> {
    match identity.common_name() {
        Some(common_name) if common_name.contains(NOTARY_WORKER_TAG) => {
            Err(TopologyInvariantError::InvalidIdentity {
                common_name: common_name.to_owned(),
            })
        }
        _ => Ok(()),
    }
}

pub fn validate_identities<'a>(
    identities: impl IntoIterator<Item = &'a Identity>,
) -> Result<(), TopologyInvariantError> {
    identities.into_iter().try_for_each(validate_identity)
}

/// Fail when any candidate is also a member. The overlap is reported sorted so
/// messages are stable between runs.
pub fn validate_no_overlap<'a>(
    members: impl IntoIterator<Item = &'a Identity>,
    candidates: impl IntoIterator<Item = &'a Identity>,
) -> Result<(), TopologyInvariantError> {
    let members: HashSet<&Identity> = members.into_iter().collect();

    let mut overlap: Vec<Identity> = candidates
        .into_iter()
        .filter(|candidate| members.contains(candidate))
        .cloned()
        .collect();

    if overlap.is_empty() {
        return Ok(());
    }

    overlap.sort();
    overlap.dedup();
    Err(TopologyInvariantError::MemberNotaryOverlap { overlap })
}
