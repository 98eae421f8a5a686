pub mod author;
pub mod common;
pub mod task;
pub mod validation;

pub use author::*;
pub use common::*;
pub use task::*;
pub use validation::*;
