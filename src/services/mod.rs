pub mod contents_report;
pub mod course_builder;
pub mod course_id_resolver;
pub mod curriculum_pager;
pub mod output_store;

pub use contents_report::render_contents;
pub use course_builder::build_course_structure;
pub use course_id_resolver::CourseIdResolver;
pub use curriculum_pager::CurriculumPager;
pub use output_store::OutputStore;
