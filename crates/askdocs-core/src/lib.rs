#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod documents;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
