pub mod assertions;
pub mod builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{assert_close, assert_close_opt, assert_mean_std_dev};
pub use builders::SourceBuilder;
#[allow(unused_imports)]
pub use setup::init_tracing;
