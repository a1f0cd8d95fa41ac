//! Command implementations.

mod run;
mod validate;

pub use run::{run_dispatch, RunOutcome};
pub use validate::run_validate;
