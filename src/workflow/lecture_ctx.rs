//! 课时处理上下文
//!
//! 封装"我正在处理第几章第几节的哪个课时"这一信息

use std::fmt::Display;

use crate::models::Lecture;
use crate::services::output_store;

/// 课时处理上下文
///
/// 显示名在构造时一次性推导，后续既做输出文件名也做日志标识
#[derive(Debug, Clone)]
pub struct LectureCtx {
    /// 所属章节序号（独立课时为 None）
    pub chapter_index: Option<usize>,

    /// 课时数据（含字幕轨）
    pub lecture: Lecture,

    /// 净化后的显示名，例如 "2.3 闭包" / "1 前言"
    pub display_name: String,
}

impl LectureCtx {
    pub fn new(chapter_index: Option<usize>, lecture: Lecture) -> Self {
        let display_name =
            output_store::display_name(chapter_index, lecture.lecture_index, &lecture.title);
        Self {
            chapter_index,
            lecture,
            display_name,
        }
    }
}

impl Display for LectureCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "「{}」", self.display_name)
    }
}
