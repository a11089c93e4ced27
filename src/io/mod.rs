pub mod config_loader;
pub mod edge_report;
pub mod render_settings;
pub mod simple_cli;
