pub mod app;
pub mod harvester;

pub use app::{normalize_course_url, App, RunOptions};
pub use harvester::{harvest, HarvestStats};
