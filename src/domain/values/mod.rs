pub mod reconcile_policy;
pub mod search;
