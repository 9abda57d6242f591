pub mod config;
pub mod error;
pub mod item;
pub mod outcome;

pub use error::*;
pub use item::*;
pub use outcome::*;
