use course_transcript_export::orchestrator::harvester::{flatten_jobs, partition_round_robin};
use course_transcript_export::services::course_builder::build_course_structure;
use course_transcript_export::services::curriculum_pager::parse_listing;
use course_transcript_export::services::render_contents;
use course_transcript_export::utils::logging;
use course_transcript_export::Config;

/// 离线全链路：目录响应 → 结构重建 → 目录清单 → 任务分片
#[test]
fn offline_pipeline_from_listing_to_partitions() {
    let body = r#"{
        "results": [
            {"_class": "chapter", "id": 10, "title": "入门", "sort_order": 100,
             "created": "2024-01-01T00:00:00Z"},
            {"_class": "lecture", "id": 11, "title": "安装", "sort_order": 99,
             "created": "2024-01-02T00:00:00Z",
             "asset": {"asset_type": "Video", "time_estimation": 300, "captions": []}},
            {"_class": "quiz", "id": 12, "title": "小测", "sort_order": 98},
            {"_class": "lecture", "id": 13, "title": "配套讲义", "sort_order": 97,
             "asset": {"asset_type": "Article", "time_estimation": 0, "captions": []}},
            {"_class": "chapter", "id": 20, "title": "进阶", "sort_order": 96,
             "created": "2024-01-03T00:00:00Z"},
            {"_class": "lecture", "id": 21, "title": "所有权", "sort_order": 95,
             "created": "2024-01-04T00:00:00Z",
             "asset": {"asset_type": "PremiumVideo", "time_estimation": 660,
                       "captions": [{"url": "https://cdn/zh.vtt", "locale_id": "zh_CN"}]}}
        ],
        "next": null
    }"#;

    let (items, next) = parse_listing(body, "https://x/api").expect("目录响应应能解析");
    assert!(next.is_none());
    assert_eq!(items.len(), 6);

    let structure = build_course_structure(items);
    assert_eq!(structure.chapters.len(), 2);
    // Article 和 quiz 被过滤，只剩两个视频课时
    assert_eq!(structure.lecture_count(), 2);
    assert_eq!(structure.chapters[1].lectures[0].lecture_index, 1);

    let report = render_contents(&structure);
    assert!(report.contains("第 1 章  入门"));
    assert!(report.contains("  1. 所有权（11 分钟）2024-01-04"));

    let jobs = flatten_jobs(&structure);
    let partitions = partition_round_robin(&jobs, 2);
    assert_eq!(partitions[0].len() + partitions[1].len(), 2);
    assert_eq!(partitions[0][0].display_name, "1.1 安装");
}

#[tokio::test]
#[ignore] // 默认忽略，需要已登录的浏览器：cargo test -- --ignored
async fn test_browser_connection() {
    logging::init();
    let config = Config::load();

    let result =
        course_transcript_export::connect_to_browser(config.browser_debug_port).await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore] // 需要真实课程页和已登录会话，手动运行
async fn test_resolve_course_id_live() {
    use course_transcript_export::services::CourseIdResolver;
    use course_transcript_export::utils::prompt::ConsolePrompt;
    use course_transcript_export::PageDriver;

    logging::init();
    let config = Config::load();

    // 注意：请根据实际情况修改课程 URL
    let course_url = std::env::var("TEST_COURSE_URL")
        .expect("请设置 TEST_COURSE_URL 环境变量指向真实课程页");

    let (_browser, page) =
        course_transcript_export::connect_to_browser(config.browser_debug_port)
            .await
            .expect("连接浏览器失败");

    let driver = PageDriver::new(page, config.settle_ms);
    let resolver = CourseIdResolver::default();
    let course_id = resolver
        .resolve(&driver, &course_url, &ConsolePrompt)
        .await
        .expect("解析课程 ID 失败");

    println!("课程 ID: {}", course_id);
    assert!(!course_id.is_empty());
}
