//! 目录结构重建 - 业务能力层
//!
//! 纯函数：把扁平的原始目录条目列表重建为"章节 → 课时"两级结构。
//! 相同输入必定产生相同输出。

use std::cmp::Reverse;

use tracing::debug;

use crate::models::{Caption, Chapter, CourseStructure, CurriculumItem, Lecture};

/// 从原始目录条目构建课程结构
///
/// - 按 sort_order 降序稳定排序（接口约定的正序）
/// - 章节条目开启新章节并重置课时计数
/// - 只保留 asset_type 包含 "video"（不区分大小写）的课时——
///   有些资源类型是复合字符串（如 "PremiumVideo"），所以用子串匹配
/// - 测验 / 练习 / 未识别条目静默丢弃（这是刻意的目录过滤，不是错误）
pub fn build_course_structure(mut items: Vec<CurriculumItem>) -> CourseStructure {
    items.sort_by_key(|item| Reverse(item.sort_order()));

    let mut structure = CourseStructure::default();
    let mut lecture_index = 0usize;

    for item in items {
        match item {
            CurriculumItem::Chapter(raw) => {
                let index = structure.chapters.len() + 1;
                structure.chapters.push(Chapter {
                    id: raw.id,
                    title: raw.title,
                    index,
                    lectures: Vec::new(),
                });
                lecture_index = 0;
            }
            CurriculumItem::Lecture(raw) => {
                let Some(asset) = raw.asset else {
                    debug!("跳过无资源课时: {}", raw.title);
                    continue;
                };
                if !asset.asset_type.to_lowercase().contains("video") {
                    debug!("跳过非视频课时: {} ({})", raw.title, asset.asset_type);
                    continue;
                }

                lecture_index += 1;
                let captions = asset
                    .captions
                    .into_iter()
                    .filter_map(|track| {
                        track
                            .url
                            .filter(|u| !u.is_empty())
                            .map(|url| Caption {
                                url,
                                locale: track.locale_id,
                            })
                    })
                    .collect();

                let lecture = Lecture {
                    id: raw.id,
                    title: raw.title,
                    created: raw.created,
                    duration_seconds: asset.time_estimation,
                    lecture_index,
                    captions,
                };

                match structure.chapters.last_mut() {
                    Some(chapter) => chapter.lectures.push(lecture),
                    // 第一个章节出现之前的课时进入独立列表
                    None => structure.standalone.push(lecture),
                }
            }
            CurriculumItem::Quiz(misc) => {
                debug!("跳过测验条目: {}", misc.title);
            }
            CurriculumItem::Practice(misc) => {
                debug!("跳过练习条目: {}", misc.title);
            }
            CurriculumItem::Other => {}
        }
    }

    structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::curriculum::{Asset, CaptionTrack, ChapterItem, LectureItem, MiscItem};

    fn chapter(id: u64, title: &str, sort: i64) -> CurriculumItem {
        CurriculumItem::Chapter(ChapterItem {
            id,
            title: title.to_string(),
            sort_order: sort,
            created: String::new(),
        })
    }

    fn lecture(id: u64, title: &str, sort: i64, asset_type: &str) -> CurriculumItem {
        CurriculumItem::Lecture(LectureItem {
            id,
            title: title.to_string(),
            sort_order: sort,
            created: "2024-03-01T08:00:00Z".to_string(),
            asset: Some(Asset {
                asset_type: asset_type.to_string(),
                time_estimation: 300,
                captions: vec![],
            }),
        })
    }

    #[test]
    fn lecture_index_resets_per_chapter() {
        // [章A, 课x, 章B, 课y]：y 在第 2 章下从 1 重新编号
        let items = vec![
            chapter(1, "章A", 100),
            lecture(2, "课x", 99, "Video"),
            chapter(3, "章B", 98),
            lecture(4, "课y", 97, "Video"),
        ];
        let structure = build_course_structure(items);
        assert_eq!(structure.chapters.len(), 2);
        assert_eq!(structure.chapters[0].index, 1);
        assert_eq!(structure.chapters[0].lectures[0].lecture_index, 1);
        assert_eq!(structure.chapters[1].index, 2);
        assert_eq!(structure.chapters[1].lectures[0].lecture_index, 1);
    }

    #[test]
    fn video_filter_uses_case_insensitive_substring() {
        let items = vec![
            chapter(1, "章", 100),
            lecture(2, "普通视频", 99, "Video"),
            lecture(3, "付费视频", 98, "PremiumVideo"),
            lecture(4, "文章", 97, "Article"),
            lecture(5, "小写视频", 96, "videoMashup"),
        ];
        let structure = build_course_structure(items);
        let titles: Vec<&str> = structure.chapters[0]
            .lectures
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["普通视频", "付费视频", "小写视频"]);
    }

    #[test]
    fn lecture_without_asset_is_dropped() {
        let items = vec![
            chapter(1, "章", 100),
            CurriculumItem::Lecture(LectureItem {
                id: 2,
                title: "无资源".to_string(),
                sort_order: 99,
                created: String::new(),
                asset: None,
            }),
        ];
        let structure = build_course_structure(items);
        assert!(structure.chapters[0].lectures.is_empty());
    }

    #[test]
    fn quiz_and_practice_silently_dropped() {
        let items = vec![
            chapter(1, "章", 100),
            CurriculumItem::Quiz(MiscItem {
                id: 2,
                title: "小测".to_string(),
                sort_order: 99,
            }),
            CurriculumItem::Practice(MiscItem {
                id: 3,
                title: "练习".to_string(),
                sort_order: 98,
            }),
            CurriculumItem::Other,
            lecture(4, "课", 97, "Video"),
        ];
        let structure = build_course_structure(items);
        assert_eq!(structure.lecture_count(), 1);
    }

    #[test]
    fn items_sorted_by_descending_sort_order() {
        // 乱序输入：按 sort_order 降序排列后，章在前课在后
        let items = vec![
            lecture(2, "课", 99, "Video"),
            chapter(1, "章", 100),
        ];
        let structure = build_course_structure(items);
        assert!(structure.standalone.is_empty());
        assert_eq!(structure.chapters[0].lectures.len(), 1);
    }

    #[test]
    fn lectures_before_first_chapter_are_standalone() {
        let items = vec![
            lecture(1, "序言", 100, "Video"),
            chapter(2, "章", 99),
            lecture(3, "正文", 98, "Video"),
        ];
        let structure = build_course_structure(items);
        assert_eq!(structure.standalone.len(), 1);
        assert_eq!(structure.standalone[0].lecture_index, 1);
        assert_eq!(structure.chapters[0].lectures[0].lecture_index, 1);
    }

    #[test]
    fn empty_caption_urls_are_discarded() {
        let items = vec![CurriculumItem::Lecture(LectureItem {
            id: 1,
            title: "带字幕".to_string(),
            sort_order: 100,
            created: String::new(),
            asset: Some(Asset {
                asset_type: "Video".to_string(),
                time_estimation: 60,
                captions: vec![
                    CaptionTrack {
                        url: Some("https://cdn/zh.vtt".to_string()),
                        locale_id: Some("zh_CN".to_string()),
                    },
                    CaptionTrack {
                        url: Some(String::new()),
                        locale_id: Some("en_US".to_string()),
                    },
                    CaptionTrack {
                        url: None,
                        locale_id: Some("ja_JP".to_string()),
                    },
                ],
            }),
        })];
        let structure = build_course_structure(items);
        let captions = &structure.standalone[0].captions;
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].locale.as_deref(), Some("zh_CN"));
    }

    #[test]
    fn reconciliation_is_deterministic() {
        let items = vec![
            chapter(1, "章A", 100),
            lecture(2, "课1", 99, "Video"),
            lecture(3, "课2", 98, "Video"),
            chapter(4, "章B", 97),
            lecture(5, "课3", 96, "Video"),
        ];
        let a = build_course_structure(items.clone());
        let b = build_course_structure(items);
        let indices = |s: &CourseStructure| {
            s.chapters
                .iter()
                .flat_map(|c| c.lectures.iter().map(move |l| (c.index, l.lecture_index)))
                .collect::<Vec<_>>()
        };
        assert_eq!(indices(&a), indices(&b));
        assert_eq!(indices(&a), vec![(1, 1), (1, 2), (2, 1)]);
    }
}
