// src/core/mod.rs

pub mod chain;
pub mod paths;
pub mod prompt;
pub mod resolver;
pub mod schema;
pub mod settings;
