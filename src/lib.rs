//! Slate-wide MLB run-total projection: totals-market odds aggregation,
//! consensus estimates per game, and a live projection over the day's
//! schedule.

pub mod http_client;
pub mod odds_fetch;
pub mod projection;
pub mod schedule_fetch;
pub mod state;
pub mod teams;
pub mod totals;
