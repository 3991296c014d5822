//! Visualization-oriented report operations

mod histogram;

pub use histogram::Histogram;

use dataprep_core::Registration;

/// The built-in visualization registrations
pub fn registrations() -> Vec<Registration> {
    vec![Registration::new(histogram::SPEC, || Box::new(Histogram))]
}
