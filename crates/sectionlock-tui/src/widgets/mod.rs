mod dots;
mod menu;
mod nav_bar;
mod page_view;
mod status_bar;

pub use dots::{dot_at, SectionDotsWidget};
pub use menu::MenuWidget;
pub use nav_bar::NavBarWidget;
pub use page_view::{page_lines, PageViewWidget};
pub use status_bar::{status_text, StatusBarWidget};
