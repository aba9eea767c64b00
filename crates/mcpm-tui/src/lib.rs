//! Terminal wizard for mcpm provisioning sessions.
//!
//! The wizard owns the terminal for the lifetime of one
//! [`ProvisioningSession`](mcpm_core::session::ProvisioningSession): it renders
//! the current phase, translates key presses into session events, and performs
//! the session's effects on tokio's blocking pool.

mod app;
pub mod keys;
pub mod view;

pub use app::run_session;
