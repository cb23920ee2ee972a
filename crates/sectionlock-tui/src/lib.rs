pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod observers;
pub mod page;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use page::PageLayout;
pub use theme::Theme;
