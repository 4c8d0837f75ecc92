pub mod budget;
pub mod report;
pub mod sales;
