pub mod chart;
pub mod config;
pub mod output;
pub mod scoring;
