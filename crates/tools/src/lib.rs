pub mod capture;
pub mod frames;
pub mod report;
