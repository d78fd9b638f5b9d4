// src/cli/handlers/mod.rs

// This module contains the logic for each CLI action.

pub mod alias;
pub mod chain;
pub mod commons;
pub mod exec;
