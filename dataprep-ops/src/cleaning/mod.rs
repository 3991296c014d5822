//! Data cleaning operations
//!
//! Missing-value handling, duplicate removal, outlier detection and
//! replacement, and format standardization. Column-level problems (a
//! non-numeric column, an incomputable statistic) are skipped with a warning
//! rather than failing the whole operation; only unusable parameters abort.

mod duplicates;
mod missing_values;
mod outliers;
mod standardize;

pub use duplicates::RemoveDuplicates;
pub use missing_values::MissingValues;
pub use outliers::{DetectOutliers, ReplaceOutliers, OUTLIER_FLAG_COLUMN};
pub use standardize::StandardizeFormat;

use dataprep_core::Registration;

/// The built-in cleaning registrations
pub fn registrations() -> Vec<Registration> {
    vec![
        Registration::new(missing_values::SPEC, || Box::new(MissingValues)),
        Registration::new(duplicates::SPEC, || Box::new(RemoveDuplicates)),
        Registration::new(outliers::DETECT_SPEC, || Box::new(DetectOutliers)),
        Registration::new(outliers::REPLACE_SPEC, || Box::new(ReplaceOutliers)),
        Registration::new(standardize::SPEC, || Box::new(StandardizeFormat)),
    ]
}
