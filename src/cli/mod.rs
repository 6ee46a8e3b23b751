mod commands;

pub use commands::*;
