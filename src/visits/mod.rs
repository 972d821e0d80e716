//! Visitor history and the approve/deny flow.

mod decision;
mod list;

pub use decision::*;
pub use list::*;
