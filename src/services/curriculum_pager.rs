//! 课程目录分页拉取 - 业务能力层
//!
//! 沿着目录接口的 next 游标逐页拉取，直到游标耗尽或达到翻页上限。
//! 每页都通过浏览器真实导航加载，复用已登录会话的 Cookie。

use std::future::Future;

use anyhow::Result;
use serde_json::Value as JsonValue;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::PageDriver;
use crate::models::CurriculumItem;

/// 目录接口的字段选择参数（固定）
const FIELDS_QUERY: &str = "fields[lecture]=title,sort_order,created,asset&fields[chapter]=title,sort_order,created&fields[asset]=asset_type,time_estimation,captions&fields[caption]=url,locale_id";

/// 课程目录分页拉取器
pub struct CurriculumPager {
    page_size: usize,
    max_pages: usize,
}

impl CurriculumPager {
    pub fn new(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }

    /// 拉取课程的全部目录条目（保持接口返回顺序拼接）
    pub async fn fetch_all(
        &self,
        driver: &PageDriver,
        origin: &Url,
        course_id: &str,
    ) -> Result<Vec<CurriculumItem>> {
        self.fetch_all_with(origin, course_id, |url| async move {
            driver.goto_idle(&url).await?;
            driver.body_text().await
        })
        .await
    }

    /// 翻页循环本体：每页响应体由 fetch_page 提供（线上走浏览器导航）
    async fn fetch_all_with<F, Fut>(
        &self,
        origin: &Url,
        course_id: &str,
        mut fetch_page: F,
    ) -> Result<Vec<CurriculumItem>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut url = self.first_page_url(origin, course_id)?;
        let mut all_items = Vec::new();

        for page_no in 1..=self.max_pages {
            info!("📄 正在拉取目录第 {} 页...", page_no);
            let body = fetch_page(url.clone()).await?;

            let (mut items, next) = parse_listing(&body, &url)?;
            info!("✓ 第 {} 页包含 {} 个目录条目", page_no, items.len());
            all_items.append(&mut items);

            match next {
                Some(cursor) => url = resolve_next(origin, &cursor)?,
                None => {
                    info!("✓ 目录拉取完成，共 {} 个条目", all_items.len());
                    return Ok(all_items);
                }
            }
        }

        // 到达翻页上限仍有 next：防御性截断，不再继续
        warn!(
            "⚠️ 已达到翻页上限 {} 页，目录可能不完整（共 {} 个条目）",
            self.max_pages,
            all_items.len()
        );
        Ok(all_items)
    }

    fn first_page_url(&self, origin: &Url, course_id: &str) -> Result<String> {
        let path = format!(
            "/api-2.0/courses/{}/subscriber-curriculum-items/?page_size={}&{}",
            course_id, self.page_size, FIELDS_QUERY
        );
        Ok(origin.join(&path)?.to_string())
    }
}

/// 解析目录接口的响应体
///
/// - 以 HTML 文档开头的响应体意味着会话失效（被重定向到登录页）→ 致命错误
/// - JSON 解析失败或缺少 results 数组 → 致命错误（无法安全继续翻页）
pub fn parse_listing(body: &str, url: &str) -> Result<(Vec<CurriculumItem>, Option<String>)> {
    let trimmed = body.trim_start();
    let lowered: String = trimmed.chars().take(16).collect::<String>().to_lowercase();
    if lowered.starts_with("<!doctype") || lowered.starts_with("<html") {
        return Err(AppError::SessionExpired {
            url: url.to_string(),
        }
        .into());
    }

    let value: JsonValue = serde_json::from_str(trimmed).map_err(|e| AppError::BadListing {
        url: url.to_string(),
        reason: format!("JSON 解析失败: {}", e),
    })?;

    let results = value
        .get("results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| AppError::BadListing {
            url: url.to_string(),
            reason: "响应缺少 results 数组".to_string(),
        })?;

    let items: Vec<CurriculumItem> =
        serde_json::from_value(JsonValue::Array(results.clone())).map_err(|e| {
            AppError::BadListing {
                url: url.to_string(),
                reason: format!("results 条目解析失败: {}", e),
            }
        })?;

    let next = value
        .get("next")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok((items, next))
}

/// 把 next 游标解析为绝对 URL（相对路径以接口源站为基准）
pub fn resolve_next(origin: &Url, cursor: &str) -> Result<String> {
    Ok(origin.join(cursor)?.to_string())
}
