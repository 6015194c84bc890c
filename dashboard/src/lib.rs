//! Presentation boundary for a voter's locking positions.
//!
//! Provides everything a dashboard front end needs:
//! - Fetch, aggregate and atomically swap the latest [`DashboardSnapshot`]
//! - Per-position rows with status badge, countdown text and primary action
//! - Action confirmation: validate, guard against double submission, dispatch, refetch
//! - TOML configuration

pub mod badge;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod row;

pub use badge::{DotColor, Icon, StatusBadge, TagColor};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSnapshot, DashboardTotals};
pub use error::DashboardError;
pub use row::PositionRow;
