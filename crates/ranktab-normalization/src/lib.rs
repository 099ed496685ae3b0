//! Display normalization for ranking table values.
//!
//! Stored cells keep their raw text. This crate derives what is shown:
//! - **Multi-value averaging**: `"70/72"` displays as `"71"`
//! - **Estimation markers**: a trailing `?` marks a reported value as estimated
//! - **Date columns**: `2024/6/1` is rewritten as `2024.6.1`
//!
//! All functions are pure and allocation-light.

pub mod dates;
pub mod multi_value;
pub mod numeric;

pub use dates::{is_date_column, normalize_date_value};
pub use multi_value::{
    EstimationInfo, Locale, describe_estimation, describe_estimation_in, estimation_info,
    is_estimated, normalize, split_values,
};
pub use numeric::{format_numeric_value, is_numeric_value, to_fixed};
