use serde::Deserialize;
use tracing::warn;

/// 程序配置文件
///
/// 优先级：环境变量 > config.toml > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 浏览器调试端口（连接已登录的浏览器）
    pub browser_debug_port: u16,
    /// 输出目录
    pub output_dir: String,
    /// 目录接口每页条目数
    pub page_size: usize,
    /// 目录翻页上限（防止 next 链成环导致死循环）
    pub max_pages: usize,
    /// 导航后的固定等待时间（毫秒），容忍前端异步渲染
    pub settle_ms: u64,
    /// 等待视频元素出现的超时（毫秒）
    pub video_wait_ms: u64,
    /// 字幕稿面板文本为空时的重试次数
    pub extract_retries: usize,
    /// 每次重试之间的间隔（毫秒）
    pub extract_retry_ms: u64,
    /// 默认并行标签页数量
    pub default_tab_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            output_dir: "transcripts".to_string(),
            page_size: 200,
            max_pages: 20,
            settle_ms: 800,
            video_wait_ms: 8000,
            extract_retries: 3,
            extract_retry_ms: 1000,
            default_tab_count: 5,
        }
    }
}

impl Config {
    /// 加载配置：先读 config.toml（如果存在），再用环境变量覆盖
    pub fn load() -> Self {
        let base = Self::from_file("config.toml").unwrap_or_default();
        Self::from_env(base)
    }

    fn from_file(path: &str) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("⚠️ 配置文件 {} 解析失败，使用默认配置: {}", path, e);
                None
            }
        }
    }

    fn from_env(base: Self) -> Self {
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", base.browser_debug_port),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(base.output_dir),
            page_size: env_parse("PAGE_SIZE", base.page_size),
            max_pages: env_parse("MAX_PAGES", base.max_pages),
            settle_ms: env_parse("SETTLE_MS", base.settle_ms),
            video_wait_ms: env_parse("VIDEO_WAIT_MS", base.video_wait_ms),
            extract_retries: env_parse("EXTRACT_RETRIES", base.extract_retries),
            extract_retry_ms: env_parse("EXTRACT_RETRY_MS", base.extract_retry_ms),
            default_tab_count: env_parse("DEFAULT_TAB_COUNT", base.default_tab_count),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
