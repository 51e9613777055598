pub mod config;
pub mod goals;
pub mod logging;
pub mod output;
pub mod roster;
pub mod scoring;
pub mod workflow;
