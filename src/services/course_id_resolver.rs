//! 课程 ID 解析 - 业务能力层
//!
//! 在已登录的会话里用多个兜底策略获取稳定的课程 ID：
//! 1. 页面根元素上的 DOM 属性
//! 2. 页内引导数据对象（data-module-args）
//! 3. 按课程 slug 调用同源接口（最后兜底）
//!
//! 每轮三个策略全部失败或导航出错时，提示操作者处理后重试，最多 3 轮。

use anyhow::Result;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::infrastructure::PageDriver;
use crate::utils::prompt::Prompt;

/// 课程 ID 解析器
pub struct CourseIdResolver {
    max_attempts: usize,
}

impl Default for CourseIdResolver {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl CourseIdResolver {
    /// 解析课程 ID
    ///
    /// 先导航到课程页并等操作者确认已登录，然后进入校验循环。
    pub async fn resolve(
        &self,
        driver: &PageDriver,
        course_url: &str,
        prompt: &dyn Prompt,
    ) -> Result<String> {
        info!("正在打开课程页: {}", course_url);
        if let Err(e) = driver.goto_idle(course_url).await {
            warn!("首次打开课程页失败（稍后会重试）: {}", e);
        }
        prompt.wait("请在浏览器中确认已登录并能看到课程页，然后按回车继续");

        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            info!("🔍 正在解析课程 ID（第 {}/{} 次）...", attempt, self.max_attempts);

            match self.try_resolve(driver, course_url).await {
                Ok(Some(course_id)) => {
                    info!("✓ 课程 ID: {}", course_id);
                    return Ok(course_id);
                }
                Ok(None) => {
                    warn!("⚠️ 三个解析策略全部失败，页面可能未登录或未加载完成");
                }
                Err(e) => {
                    warn!("⚠️ 解析过程中导航出错: {}", e);
                    last_error = format!("{:#}", e);
                }
            }

            if attempt < self.max_attempts {
                prompt.wait("请检查浏览器中的课程页状态（登录 / 加载），处理好后按回车重试");
            }
        }

        Err(AppError::CourseIdExhausted {
            attempts: self.max_attempts,
            last_error,
        }
        .into())
    }

    /// 单轮解析：重新导航，然后按顺序尝试三个策略，首个成功者胜出
    async fn try_resolve(&self, driver: &PageDriver, course_url: &str) -> Result<Option<String>> {
        driver.goto_idle(course_url).await?;

        if let Some(id) = self.from_body_attribute(driver).await {
            debug!("策略 1（DOM 属性）命中");
            return Ok(Some(id));
        }
        if let Some(id) = self.from_bootstrap_args(driver).await {
            debug!("策略 2（引导数据对象）命中");
            return Ok(Some(id));
        }
        if let Some(id) = self.from_slug_api(driver, course_url).await {
            debug!("策略 3（slug 接口）命中");
            return Ok(Some(id));
        }
        Ok(None)
    }

    /// 策略 1：body 上的 data-clp-course-id 属性
    async fn from_body_attribute(&self, driver: &PageDriver) -> Option<String> {
        let value: Option<String> = driver
            .eval_as(r#"document.body ? document.body.getAttribute("data-clp-course-id") : null"#)
            .await
            .ok()?;
        value.filter(|v| !v.is_empty())
    }

    /// 策略 2：应用加载器元素上的 data-module-args 引导 JSON
    async fn from_bootstrap_args(&self, driver: &PageDriver) -> Option<String> {
        let value: JsonValue = driver
            .eval(
                r#"
                (() => {
                    const el = document.querySelector(".ud-app-loader[data-module-args]");
                    if (!el) return null;
                    try {
                        const args = JSON.parse(el.getAttribute("data-module-args"));
                        return args.courseId ?? args.course_id ?? null;
                    } catch (err) {
                        return null;
                    }
                })()
                "#,
            )
            .await
            .ok()?;
        json_id_to_string(&value)
    }

    /// 策略 3：按 slug 调用同源接口查询课程 ID
    async fn from_slug_api(&self, driver: &PageDriver, course_url: &str) -> Option<String> {
        let slug = course_slug(course_url);
        if slug.is_empty() {
            return None;
        }
        let js = format!(
            r#"
            (async () => {{
                try {{
                    const res = await fetch("/api-2.0/courses/{}/?fields[course]=id", {{
                        credentials: "include"
                    }});
                    if (!res.ok) return null;
                    const data = await res.json();
                    return data.id ?? null;
                }} catch (err) {{
                    return null;
                }}
            }})()
            "#,
            slug
        );
        let value: JsonValue = driver.eval(js).await.ok()?;
        json_id_to_string(&value)
    }
}

/// 把接口 / 引导数据里的 ID（数字或字符串）统一成字符串
fn json_id_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// 从课程 URL 里提取 slug：取路径中 "course" 字面段的下一段
///
/// 模式不存在时返回空字符串
pub fn course_slug(course_url: &str) -> String {
    let path = match url::Url::parse(course_url) {
        Ok(u) => u.path().to_string(),
        Err(_) => course_url.to_string(),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments
        .iter()
        .position(|&s| s == "course")
        .and_then(|pos| segments.get(pos + 1))
        .map(|s| s.to_string())
        .unwrap_or_default()
}
