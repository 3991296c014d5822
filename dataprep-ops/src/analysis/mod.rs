//! Report-producing analysis operations

mod correlation;
mod descriptive;

pub use correlation::Correlation;
pub use descriptive::Descriptive;

use dataprep_core::Registration;

/// The built-in analysis registrations
pub fn registrations() -> Vec<Registration> {
    vec![
        Registration::new(descriptive::SPEC, || Box::new(Descriptive)),
        Registration::new(correlation::SPEC, || Box::new(Correlation)),
    ]
}
