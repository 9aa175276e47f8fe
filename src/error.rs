//! 应用程序错误类型
//!
//! 只为"必须终止整个运行"的错误建模：
//! - 会话失效（接口返回 HTML 登录页）
//! - 课程目录响应结构异常（无法安全继续翻页）
//! - 课程 ID 解析重试耗尽
//!
//! 单个课时的处理失败不在这里建模——它们被编排层就地捕获并记录日志，
//! 不会中断其他课时的处理。

use thiserror::Error;

/// 致命错误：一旦发生，整个运行立即终止
#[derive(Debug, Error)]
pub enum AppError {
    /// 会话失效：预期 JSON 的接口返回了 HTML 文档
    #[error("会话已失效：{url} 返回了 HTML 页面（疑似被重定向到登录页），请重新登录后再运行")]
    SessionExpired { url: String },

    /// 课程目录响应结构异常
    #[error("课程目录响应异常（{url}）：{reason}")]
    BadListing { url: String, reason: String },

    /// 课程 ID 解析重试耗尽
    #[error("课程 ID 解析失败，已尝试 {attempts} 次（最后一次错误：{last_error}）")]
    CourseIdExhausted { attempts: usize, last_error: String },
}
