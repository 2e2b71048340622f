pub mod group_params;
pub mod invariants;
pub mod notary;
