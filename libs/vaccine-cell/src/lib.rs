pub mod eligibility;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use eligibility::{AgeCriterion, UserAge};
pub use models::*;
pub use router::vaccine_routes;
pub use services::VaccineService;
