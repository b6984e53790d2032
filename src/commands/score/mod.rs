mod load;
mod output;
mod run;
mod store;

pub use load::load_schema;
pub use run::run;
pub use store::{RunSummaryRow, latest_run, open_history, run_count};
#[cfg(test)]
pub(crate) use store::ensure_schema as ensure_history_schema;
