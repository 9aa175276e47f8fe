//! 页面驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露能力：
//! - 导航并等待网络静默
//! - 执行 JS
//! - 等待元素可见 / 点击元素
//! - 带 Cookie 的页内 fetch
//!
//! 不认识 Lecture / Chapter，不处理业务流程。

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// 元素可见性轮询间隔（毫秒）
const POLL_INTERVAL_MS: u64 = 250;

/// 页面驱动器
pub struct PageDriver {
    page: Page,
    settle_ms: u64,
}

impl PageDriver {
    pub fn new(page: Page, settle_ms: u64) -> Self {
        Self { page, settle_ms }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 关闭底层页面（标签页处理完分片后调用）
    pub async fn close(self) {
        let _ = self.page.close().await;
    }

    /// 导航到 URL 并等待网络静默 + 固定渲染等待
    pub async fn goto_idle(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        self.page
            .wait_for_navigation()
            .await
            .with_context(|| format!("等待 {} 加载完成失败", url))?;
        self.settle().await;
        Ok(())
    }

    /// 固定渲染等待：容忍前端异步渲染，不绑定具体条件
    pub async fn settle(&self) {
        sleep(Duration::from_millis(self.settle_ms)).await;
    }

    /// 自定义时长的短暂停顿
    pub async fn pause(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 读取当前页面 body 的原始文本
    ///
    /// 导航到 JSON 接口时浏览器会把响应体包在 pre 元素里，
    /// innerText 拿到的就是原始响应文本。
    pub async fn body_text(&self) -> Result<String> {
        self.eval_as(r#"document.body ? document.body.innerText : """#)
            .await
    }

    /// 判断选择器命中的元素当前是否可见
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()
            "#,
            sel = js_string(selector)
        );
        self.eval_as(js).await
    }

    /// 轮询等待元素可见，超时返回 false（不视为错误）
    pub async fn wait_for_visible(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let mut waited = 0;
        loop {
            if self.is_visible(selector).await? {
                return Ok(true);
            }
            if waited >= timeout_ms {
                return Ok(false);
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            waited += POLL_INTERVAL_MS;
        }
    }

    /// 点击选择器命中的第一个元素，元素不存在返回 false
    pub async fn click(&self, selector: &str) -> Result<bool> {
        let js = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            sel = js_string(selector)
        );
        self.eval_as(js).await
    }

    /// 在页面上下文内用当前会话的 Cookie 拉取文本资源
    ///
    /// 拉取失败时返回 None（由调用方决定是否致命）
    pub async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        let js = format!(
            r#"
            (async () => {{
                try {{
                    const res = await fetch({url}, {{ credentials: "include" }});
                    if (!res.ok) return null;
                    return await res.text();
                }} catch (err) {{
                    return null;
                }}
            }})()
            "#,
            url = js_string(url)
        );
        self.eval_as(js).await
    }
}

/// 把 Rust 字符串编码成可以安全内嵌在 JS 里的字符串字面量
fn js_string(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_string_escapes_quotes() {
        assert_eq!(
            js_string(r#"button[data-purpose="transcript-toggle"]"#),
            r#""button[data-purpose=\"transcript-toggle\"]""#
        );
    }
}
