pub mod invariants;
pub mod policy;
pub mod reports;
pub mod simulation;

pub use policy::Strategy;
pub use simulation::{CampaignRun, run_campaigns};
