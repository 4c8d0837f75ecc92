pub mod aggregate;
pub mod ask;
pub mod budget;
pub mod import;
pub mod preview;
pub mod report;
