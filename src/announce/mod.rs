pub mod client;
pub mod params;
pub mod task;

pub use client::{AnnounceClient, TrackerResponse};
pub use params::AnnounceEvent;
pub use task::AnnounceTask;
