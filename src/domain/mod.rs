pub mod models;
pub mod presets;
