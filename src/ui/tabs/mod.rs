//! Tab rendering modules

mod about;
mod home;
mod projects;

pub use about::render_about_tab;
pub use home::render_home_tab;
pub use projects::render_projects_tab;
