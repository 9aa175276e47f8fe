//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接浏览器（连不上则启动新实例）、创建主页面驱动
//! 2. **整体流程**：解析课程 ID → 分页拉取目录 → 重建结构 → 写目录清单 → 并行采集
//! 3. **资源管理**：唯一持有 Browser，失败路径上保证浏览器被关闭
//! 4. **错误分级**：会话 / 结构错误向上冒泡终止运行，课时级错误在采集器内部消化

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{info, warn};
use url::Url;

use crate::browser;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::CourseStructure;
use crate::orchestrator::harvester;
use crate::services::{
    build_course_structure, render_contents, CourseIdResolver, CurriculumPager, OutputStore,
};
use crate::utils::prompt::Prompt;

/// 本次运行的选项（CLI 参数 + 交互提示的合并结果）
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 课程页 URL（保证以 / 结尾）
    pub course_url: String,
    /// 并行标签页数量
    pub tab_count: usize,
    /// 是否同时导出字幕文件
    pub download_subtitles: bool,
}

/// 应用主结构
pub struct App {
    config: Config,
    options: RunOptions,
    browser: Browser,
    /// 浏览器是否由本程序启动（只有自己启动的才在退出时关闭）
    launched: bool,
    driver: PageDriver,
}

impl App {
    /// 初始化应用：优先连接调试端口上已登录的浏览器，失败则启动新实例
    pub async fn initialize(config: Config, options: RunOptions) -> Result<Self> {
        log_startup(&config, &options);

        let (browser, page, launched) =
            match browser::connect_to_browser(config.browser_debug_port).await {
                Ok((browser, page)) => (browser, page, false),
                Err(e) => {
                    warn!(
                        "⚠️ 无法连接到调试端口 {}（{}），改为启动新浏览器",
                        config.browser_debug_port, e
                    );
                    let (browser, page) = browser::launch_browser().await?;
                    (browser, page, true)
                }
            };

        let driver = PageDriver::new(page, config.settle_ms);

        Ok(Self {
            config,
            options,
            browser,
            launched,
            driver,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self, prompt: &dyn Prompt) -> Result<()> {
        // 1. 解析课程 ID（内含登录确认 + 有界重试）
        let resolver = CourseIdResolver::default();
        let course_id = resolver
            .resolve(&self.driver, &self.options.course_url, prompt)
            .await?;

        // 2. 分页拉取目录
        let origin = course_origin(&self.options.course_url)?;
        let pager = CurriculumPager::new(&self.config);
        let items = pager.fetch_all(&self.driver, &origin, &course_id).await?;

        // 3. 重建课程结构
        let structure = build_course_structure(items);
        if structure.is_empty() {
            warn!("⚠️ 课程里没有可处理的视频课时，程序结束");
            return Ok(());
        }
        log_structure(&structure);

        // 4. 写目录清单
        let store = OutputStore::new(&self.config.output_dir)?;
        let report_path = store.save_report("课程目录.txt", &render_contents(&structure))?;
        info!("📄 目录清单已写入: {}", report_path.display());

        // 5. 并行采集
        let stats = harvester::harvest(
            &self.browser,
            &structure,
            &self.options.course_url,
            self.options.download_subtitles,
            self.options.tab_count,
            &self.config,
        )
        .await?;

        info!("\n输出目录: {}", store.root().display());
        if stats.failed > 0 {
            warn!("⚠️ 有 {} 个课时处理失败，重新运行可以只补齐缺失的部分", stats.failed);
        }

        Ok(())
    }

    /// 释放浏览器资源（由本程序启动的实例才真正关闭）
    pub async fn shutdown(mut self) {
        if self.launched {
            let _ = self.browser.close().await;
        }
    }
}

/// 规范化课程 URL：去重尾部斜杠后补一个
pub fn normalize_course_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

/// 提取课程 URL 的源站（scheme + host）
fn course_origin(course_url: &str) -> Result<Url> {
    let parsed = Url::parse(course_url)
        .with_context(|| format!("课程 URL 无法解析: {}", course_url))?;
    let origin = parsed.origin().ascii_serialization();
    Url::parse(&origin).with_context(|| format!("课程 URL 缺少源站信息: {}", course_url))
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config, options: &RunOptions) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 课程字幕稿批量导出");
    info!("📚 课程: {}", options.course_url);
    info!("📊 并行标签页: {}", options.tab_count);
    info!("💬 导出字幕文件: {}", if options.download_subtitles { "是" } else { "否" });
    info!("📁 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

fn log_structure(structure: &CourseStructure) {
    info!(
        "✓ 课程结构: {} 个章节，{} 个独立课时，共 {} 个视频课时",
        structure.chapters.len(),
        structure.standalone.len(),
        structure.lecture_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_single_trailing_slash() {
        assert_eq!(
            normalize_course_url("https://x.com/course/rust"),
            "https://x.com/course/rust/"
        );
        assert_eq!(
            normalize_course_url("https://x.com/course/rust///"),
            "https://x.com/course/rust/"
        );
        assert_eq!(
            normalize_course_url("  https://x.com/course/rust/  "),
            "https://x.com/course/rust/"
        );
    }

    #[test]
    fn origin_strips_path_and_query() {
        let origin = course_origin("https://www.example-learn.com/course/rust/?src=nav").unwrap();
        assert_eq!(origin.as_str(), "https://www.example-learn.com/");
    }
}
