mod summary;
mod tally;
pub mod views;

pub use summary::DonorReport;
pub use tally::ReportTally;
