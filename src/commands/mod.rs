pub mod completions;
pub mod migrate;
pub mod record;
pub mod render;
pub mod session;
pub mod settings;
pub mod show;
pub mod status;
