#![forbid(unsafe_code)]

pub mod model;
pub mod shuffle;

pub use shuffle::shuffled;
