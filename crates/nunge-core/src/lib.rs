pub mod config;
pub mod logging;

pub mod descriptor;
pub mod fetcher;
pub mod filename;
pub mod retry;
pub mod storage;
pub mod transport;
