pub mod config;
pub mod presets;
pub mod run;
pub mod simulate;
