pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod render;
pub mod weather;
