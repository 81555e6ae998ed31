//! Per-service deployment: placeholder substitution, the provisioning
//! pipeline, and side-effect-free planning.
pub mod pipeline;
pub mod plan;
pub mod vars;

pub use pipeline::{ProvisionReport, Step, provision};
pub use plan::{DeploymentPlan, ServicePlan};
pub use vars::Formatter;

#[cfg(test)]
pub mod test_helpers;
