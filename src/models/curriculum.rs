//! 课程目录接口的原始数据结构
//!
//! 对应目录接口返回的条目（`_class` 标记类型），一旦拉取不再修改。

use serde::Deserialize;

/// 目录接口返回的单个条目
///
/// `_class` 字段区分条目类型，未识别的类型落入 `Other`（后续被静默丢弃）
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_class", rename_all = "lowercase")]
pub enum CurriculumItem {
    Chapter(ChapterItem),
    Lecture(LectureItem),
    Quiz(MiscItem),
    Practice(MiscItem),
    #[serde(other)]
    Other,
}

impl CurriculumItem {
    /// 排序权重：接口约定 sort_order 降序为正序
    pub fn sort_order(&self) -> i64 {
        match self {
            CurriculumItem::Chapter(c) => c.sort_order,
            CurriculumItem::Lecture(l) => l.sort_order,
            CurriculumItem::Quiz(m) | CurriculumItem::Practice(m) => m.sort_order,
            CurriculumItem::Other => 0,
        }
    }
}

/// 章节条目
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created: String,
}

/// 课时条目
#[derive(Debug, Clone, Deserialize)]
pub struct LectureItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created: String,
    /// 只有课时条目携带资源描述；没有资源的课时会被过滤掉
    #[serde(default)]
    pub asset: Option<Asset>,
}

/// 测验 / 练习等非视频条目（只保留日志需要的字段）
#[derive(Debug, Clone, Deserialize)]
pub struct MiscItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// 课时的资源描述
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub asset_type: String,
    /// 预估时长（秒）
    #[serde(default)]
    pub time_estimation: u64,
    #[serde(default)]
    pub captions: Vec<CaptionTrack>,
}

/// 字幕轨描述（接口原始格式，url 可能为空）
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub locale_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_tagged_items() {
        let json = r#"[
            {"_class": "chapter", "id": 1, "title": "第一章", "sort_order": 100, "created": "2024-01-01T00:00:00Z"},
            {"_class": "lecture", "id": 2, "title": "课时一", "sort_order": 99,
             "asset": {"asset_type": "Video", "time_estimation": 300,
                       "captions": [{"url": "https://cdn/vtt", "locale_id": "zh_CN"}]}},
            {"_class": "quiz", "id": 3, "title": "小测", "sort_order": 98},
            {"_class": "practice", "id": 4, "sort_order": 97},
            {"_class": "coding_exercise", "id": 5}
        ]"#;
        let items: Vec<CurriculumItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 5);
        assert!(matches!(items[0], CurriculumItem::Chapter(_)));
        assert!(matches!(items[1], CurriculumItem::Lecture(_)));
        assert!(matches!(items[2], CurriculumItem::Quiz(_)));
        assert!(matches!(items[3], CurriculumItem::Practice(_)));
        // 未识别的 _class 落入 Other
        assert!(matches!(items[4], CurriculumItem::Other));
    }

    #[test]
    fn lecture_without_asset_is_valid() {
        let json = r#"{"_class": "lecture", "id": 9, "title": "无资源课时", "sort_order": 1}"#;
        let item: CurriculumItem = serde_json::from_str(json).unwrap();
        match item {
            CurriculumItem::Lecture(l) => assert!(l.asset.is_none()),
            _ => panic!("应解析为课时条目"),
        }
    }
}
