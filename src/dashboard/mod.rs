pub mod service;

pub use service::{DashboardOutcome, DashboardService, InvalidCity, SAVED_MESSAGE};
