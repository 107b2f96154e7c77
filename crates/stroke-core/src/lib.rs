#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod assess;
pub mod config;
pub mod encoder;
pub mod error;
pub mod recommendation;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
