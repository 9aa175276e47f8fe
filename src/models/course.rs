//! 重建后的课程结构
//!
//! 由 `services::course_builder` 从原始目录条目一次性构建，之后只读。

/// 经过过滤的字幕轨（url 保证非空）
#[derive(Debug, Clone)]
pub struct Caption {
    pub url: String,
    /// 语言标记，缺失时保存文件用 "unknown" 兜底
    pub locale: Option<String>,
}

/// 课时
#[derive(Debug, Clone)]
pub struct Lecture {
    pub id: u64,
    pub title: String,
    pub created: String,
    pub duration_seconds: u64,
    /// 章节内从 1 开始的序号，每进入新章节重置
    pub lecture_index: usize,
    pub captions: Vec<Caption>,
}

/// 章节
#[derive(Debug, Clone)]
pub struct Chapter {
    pub id: u64,
    pub title: String,
    /// 全课程范围内从 1 开始的章节序号
    pub index: usize,
    pub lectures: Vec<Lecture>,
}

/// 课程结构根聚合：章节列表 + 不属于任何章节的独立课时
#[derive(Debug, Clone, Default)]
pub struct CourseStructure {
    pub chapters: Vec<Chapter>,
    pub standalone: Vec<Lecture>,
}

impl CourseStructure {
    /// 课程内保留下来的视频课时总数
    pub fn lecture_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lectures.len()).sum::<usize>() + self.standalone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lecture_count() == 0
    }
}
