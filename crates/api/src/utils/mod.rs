//! Helpers shared by the binary and the command wrappers

pub mod logging;
