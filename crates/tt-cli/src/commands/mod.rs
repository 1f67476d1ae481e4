//! Command implementations.

pub mod edit;
pub mod export;
pub mod list;
pub mod remove;
pub mod resume;
pub mod start;
pub mod stats;
pub mod status;
pub mod stop;
pub mod util;
pub mod vacation;
