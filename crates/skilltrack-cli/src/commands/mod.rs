pub mod calendar;
pub mod compare;
pub mod init;
pub mod insights;
pub mod plan;
pub mod score;
pub mod stats;
