//! Presenters for a [`FormSummary`](crate::models::FormSummary). None of them
//! compute statistics of their own.

pub mod chart;
pub mod export;
pub mod markdown;
