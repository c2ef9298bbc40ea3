pub mod api;
pub mod dataset;
pub mod output;
pub mod parser;
pub mod ranking;
pub mod stats;
pub mod store;
