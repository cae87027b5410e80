//! livequeue — live contact-queue dashboard.
//!
//! Polls a queue-status endpoint, renders contacts as a terminal table,
//! lets an agent pick unassigned contacts, and pauses polling when the
//! operator goes idle.

pub mod config;
pub mod identity;
pub mod pick;
pub mod queue;
pub mod session;
pub mod tui;
