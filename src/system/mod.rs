//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying operating system.
//! It serves as a boundary between the core resolution logic and the specifics of process
//! management and on-disk files.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns external processes, with platform-specific command
//!   execution (e.g., `cmd.exe` on Windows) and exit code propagation.
//! - **`finder`**: Locates the project root by walking up to the nearest
//!   `composer.json` marker.
//! - **`generator`**: Persists resolved alias definitions as per-site YAML files.

pub mod executor;
pub mod finder;
pub mod generator;
