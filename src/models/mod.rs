//! Value types shared by entities, services and handlers.

pub mod flags;

pub use flags::{CategoryFlags, ShowAllowed, TerminalType};
