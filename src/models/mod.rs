pub mod course;
pub mod curriculum;

pub use course::{Caption, Chapter, CourseStructure, Lecture};
pub use curriculum::{Asset, CaptionTrack, ChapterItem, CurriculumItem, LectureItem};
