pub mod app;
pub mod event;
pub mod prompt;
pub mod ui;

pub use app::App;
