#![allow(dead_code)]

pub mod recorder;
pub mod strategies;

#[allow(unused_imports)]
pub use recorder::*;
#[allow(unused_imports)]
pub use strategies::*;
