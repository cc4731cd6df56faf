//! Pure scoring algorithms used by the model: shared-rank ranking, top-N
//! truncation and descriptive statistics.

pub mod ranking;
pub mod summary;

pub use ranking::{dense_ranks, top_n_sum, Rankings};
pub use summary::{corr_coeff, histogram, mean_std_dev, MeanStdDev};
