// Migration driver around the normalizer.
// source: finds and decodes records; store: backup-then-overwrite;
// report: outcomes, counts and summary text; runner: the batch loop.

pub mod report;
pub mod runner;
pub mod source;
pub mod store;

pub use report::render_summary;
pub use runner::{run_migration, MigrationOptions};
