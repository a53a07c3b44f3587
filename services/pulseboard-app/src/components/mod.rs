//! UI components

pub mod dashboard;
pub mod data_table;
pub mod live_chart;
pub mod login;
