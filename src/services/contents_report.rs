//! 课程目录报告 - 业务能力层
//!
//! 把重建后的课程结构渲染成人类可读的目录清单。

use chrono::DateTime;

use crate::models::{CourseStructure, Lecture};

/// 渲染课程目录清单
pub fn render_contents(structure: &CourseStructure) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(60));
    out.push_str("\n课程目录\n");
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");

    for chapter in &structure.chapters {
        out.push_str(&format!("第 {} 章  {}\n", chapter.index, chapter.title));
        for lecture in &chapter.lectures {
            out.push_str(&render_lecture_line(lecture));
        }
        out.push('\n');
    }

    if !structure.standalone.is_empty() {
        out.push_str("独立课时\n");
        for lecture in &structure.standalone {
            out.push_str(&render_lecture_line(lecture));
        }
        out.push('\n');
    }

    out
}

fn render_lecture_line(lecture: &Lecture) -> String {
    format!(
        "  {}. {}（{} 分钟）{}\n",
        lecture.lecture_index,
        lecture.title,
        whole_minutes(lecture.duration_seconds),
        format_created(&lecture.created)
    )
}

/// 时长取整分钟，不足一分钟按 1 分钟显示
fn whole_minutes(seconds: u64) -> u64 {
    seconds.div_ceil(60)
}

/// 创建日期格式化为本地可读形式；解析失败时原样输出
fn format_created(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
