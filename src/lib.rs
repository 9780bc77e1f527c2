//! Toastline - desktop notifications that report back
//!
//! Posts a notification and resolves to what the user did with it:
//! clicked, dismissed, or nothing before the grace period ran out.
//! Future-dated notifications are handed to a wake scheduler and
//! re-enter the same path when they fire.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the scheduled payload format, and errors
//! - **Application**: The dispatcher, result registry, event receiver, and port traits
//! - **Infrastructure**: Adapters for notify-rust, tokio timers, and the XDG config file
//! - **CLI**: Argument parsing, output, and logging setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
