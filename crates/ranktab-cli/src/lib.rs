//! Library components of the `ranktab` command line tool.

pub mod config;
pub mod logging;
pub mod state;
