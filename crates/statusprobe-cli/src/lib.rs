pub mod error;
pub mod observation;
pub mod report;
pub mod run;
pub mod summary;
pub mod verifier;

pub use error::{CheckError, Error, Result};
pub use summary::{CheckResult, RunSummary};
pub use verifier::Verifier;
