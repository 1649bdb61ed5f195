mod date;
mod expense;

pub use date::*;
pub use expense::*;
