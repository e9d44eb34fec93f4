pub mod calculator;
pub mod config;
pub mod export;
pub mod ledger;
pub mod list;
pub mod location;
pub mod log;
pub mod report;
