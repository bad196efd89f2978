mod planner;
mod selector;
mod workflow;

pub use planner::*;
pub use selector::*;
pub use workflow::*;
