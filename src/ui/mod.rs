pub mod app;
pub mod view;

pub use app::App;
