pub mod audit;
pub mod task;

pub use audit::*;
pub use task::*;
