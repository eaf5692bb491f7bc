//! CLI commands module.

mod correct;
mod identify;
mod roster;
mod util;

pub use correct::CorrectCommand;
pub use identify::IdentifyCommand;
pub use roster::RosterCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
