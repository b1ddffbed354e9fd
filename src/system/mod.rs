//! # System Interaction Layer
//!
//! The boundary between the build logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns one process per action, forwards its captured output
//!   and turns its exit status into a result. Handles the platform dispatch
//!   (direct execution on Unix, `cmd.exe /C` elsewhere).

pub mod executor;
