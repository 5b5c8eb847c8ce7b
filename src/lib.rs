pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardening;
pub mod input;
pub mod net;
pub mod state;
pub mod store;

// Convenient re-exports (so call sites can do `coursereg::Registry`, etc.)
pub use client::CourseClient;
pub use coursereg_core::{Course, RegistrationForm};
pub use state::{
    registry::Registry,
    session::{ConnState, Session},
};
