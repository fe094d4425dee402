pub mod fingerprint;
pub mod labels;

pub use fingerprint::Fingerprint;
pub use labels::METRIC_NAME_LABEL;
