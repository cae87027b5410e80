//! The live queue dashboard — ratatui TUI presentation layer.
//!
//! Renders the queue snapshot as a terminal table with filter controls,
//! a confirmation modal, a pick loading overlay, and the inactivity modal.
//!
//! ## Architecture (TEA)
//!
//! Model (`DashboardApp`) + Update (message handler returning commands) +
//! View (render). Immediate mode, no retained widget state. Row view
//! models decouple the queue types from ratatui.

pub mod app;
pub mod dashboard;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
pub mod table;
