pub mod classifier;
pub mod indicators;
pub mod memory;
pub mod poller;
pub mod snapshot;
