//! Adapters binding library seams to the command-line environment

pub mod terminal;

pub use terminal::TerminalSurface;
