pub mod agent;
pub mod app;
pub mod cli;
pub mod events;
pub mod theme;
pub mod ui;
