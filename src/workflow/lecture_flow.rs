//! 课时处理流程 - 流程层
//!
//! 核心职责：定义"一节课"的完整处理流程
//!
//! 流程顺序：
//! 1. 已有输出文件 → 直接跳过（断点续传）
//! 2. 导航到播放页，等视频元素出现（出不来也不致命）
//! 3. 依次尝试多个选择器策略打开字幕稿面板
//! 4. 提取面板文本（为空时重试，最多 3 次）
//! 5. 保存字幕稿
//! 6. 需要时逐条下载字幕轨并转成 SRT（单条失败不影响其余）

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::services::OutputStore;
use crate::subtitle;
use crate::workflow::lecture_ctx::LectureCtx;

/// 字幕稿开关按钮的选择器策略（按顺序尝试）
const TOGGLE_SELECTORS: [&str; 3] = [
    r#"button[data-purpose="transcript-toggle"]"#,
    r#"button[class*="transcript-toggle"]"#,
    r#"button[aria-label*="Transcript"], button[aria-label*="字幕"]"#,
];

/// 字幕稿面板的选择器（任一可见即视为面板已打开）
const PANEL_SELECTORS: [&str; 2] = [
    r#"[data-purpose="transcript-panel"]"#,
    r#"div[class*="transcript--transcript-panel"]"#,
];

/// 点击开关后等面板展开的固定停顿（毫秒）
const PANEL_OPEN_PAUSE_MS: u64 = 600;

/// 课时处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LectureOutcome {
    /// 字幕稿已保存
    Saved,
    /// 输出文件已存在，本次跳过
    SkippedExisting,
    /// 该课时没有字幕稿控件（已写入占位文件）
    NoTranscript,
    /// 面板打开了但重试后文本仍为空，未写入字幕稿
    EmptyTranscript,
}

/// 课时处理流程
///
/// - 编排完整的单课时处理流程
/// - 持有本标签页的 PageDriver 和输出存储
/// - 单课时内部的任何失败都不会波及其他课时（由编排层捕获）
pub struct LectureFlow {
    driver: PageDriver,
    store: OutputStore,
    course_url: String,
    download_subtitles: bool,
    video_wait_ms: u64,
    extract_retries: usize,
    extract_retry_ms: u64,
}

impl LectureFlow {
    pub fn new(
        driver: PageDriver,
        store: OutputStore,
        course_url: String,
        download_subtitles: bool,
        config: &Config,
    ) -> Self {
        Self {
            driver,
            store,
            course_url,
            download_subtitles,
            video_wait_ms: config.video_wait_ms,
            extract_retries: config.extract_retries,
            extract_retry_ms: config.extract_retry_ms,
        }
    }

    /// 处理完一个分片后关闭底层标签页
    pub async fn finish(self) {
        self.driver.close().await;
    }

    /// 执行单课时的完整处理流程
    pub async fn run(&self, tab_index: usize, ctx: &LectureCtx) -> Result<LectureOutcome> {
        // 1. 断点续传检查：输出文件在就什么都不做
        if self.store.transcript_exists(&ctx.display_name) {
            info!("[标签页 {}] ⏭️ 已存在，跳过 {}", tab_index, ctx);
            return Ok(LectureOutcome::SkippedExisting);
        }

        // 2. 导航到播放页
        let player_url = format!("{}learn/lecture/{}", self.course_url, ctx.lecture.id);
        self.driver.goto_idle(&player_url).await?;

        // 视频元素只是就绪信号，出不来可能是懒加载，继续往下走
        if !self.driver.wait_for_visible("video", self.video_wait_ms).await? {
            warn!(
                "[标签页 {}] ⚠️ 视频元素未出现（可能懒加载），继续尝试 {}",
                tab_index, ctx
            );
        }
        self.driver.settle().await;

        // 3. 打开字幕稿面板
        if !self.open_transcript_panel(tab_index).await? {
            info!("[标签页 {}] 该课时没有字幕稿控件 {}", tab_index, ctx);
            let placeholder = format!("{}\n\n（该课时未提供字幕稿）\n", ctx.display_name);
            self.store.save_transcript(&ctx.display_name, &placeholder)?;
            return Ok(LectureOutcome::NoTranscript);
        }

        // 4. 提取文本（面板可能异步填充，为空时重试）
        let text = self.extract_transcript_text().await?;
        if text.trim().is_empty() {
            warn!(
                "[标签页 {}] ⚠️ 重试 {} 次后字幕稿仍为空，不写入 {}",
                tab_index, self.extract_retries, ctx
            );
            return Ok(LectureOutcome::EmptyTranscript);
        }

        // 5. 保存字幕稿（首行为显示名）
        let body = format!("{}\n\n{}\n", ctx.display_name, text.trim_end());
        self.store.save_transcript(&ctx.display_name, &body)?;
        info!("[标签页 {}] ✓ 字幕稿已保存 {}", tab_index, ctx);

        // 6. 可选：下载字幕轨
        if self.download_subtitles && !ctx.lecture.captions.is_empty() {
            self.save_captions(tab_index, ctx).await;
        }

        Ok(LectureOutcome::Saved)
    }

    /// 依次尝试选择器策略：控件存在、点击后面板可见才算成功
    ///
    /// 全部失败不是错误——意味着该课时没有字幕稿
    async fn open_transcript_panel(&self, tab_index: usize) -> Result<bool> {
        for selector in TOGGLE_SELECTORS {
            if !self.driver.is_visible(selector).await? {
                continue;
            }
            if !self.driver.click(selector).await? {
                continue;
            }
            self.driver.pause(PANEL_OPEN_PAUSE_MS).await;

            for panel in PANEL_SELECTORS {
                if self.driver.is_visible(panel).await? {
                    debug!("[标签页 {}] 字幕稿面板已打开（策略: {}）", tab_index, selector);
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// 从面板里抓取全部 cue 文本，按行拼接
    async fn extract_transcript_text(&self) -> Result<String> {
        const EXTRACT_JS: &str = r#"
            (() => {
                const cues = document.querySelectorAll('[data-purpose="cue-text"]');
                return Array.from(cues).map(c => c.textContent.trim()).join("\n");
            })()
        "#;

        let mut attempt = 0;
        loop {
            let text: String = self.driver.eval_as(EXTRACT_JS).await?;
            if !text.trim().is_empty() {
                return Ok(text);
            }
            if attempt >= self.extract_retries {
                return Ok(String::new());
            }
            attempt += 1;
            self.driver.pause(self.extract_retry_ms).await;
        }
    }

    /// 逐条下载字幕轨并转成 SRT，单条失败记录日志后继续
    async fn save_captions(&self, tab_index: usize, ctx: &LectureCtx) {
        info!(
            "[标签页 {}] 📥 正在下载 {} 条字幕轨 {}",
            tab_index,
            ctx.lecture.captions.len(),
            ctx
        );

        for caption in &ctx.lecture.captions {
            let locale = caption.locale.as_deref();
            match self.driver.fetch_text(&caption.url).await {
                Ok(Some(vtt)) => {
                    let srt = subtitle::vtt_to_srt(&vtt);
                    if let Err(e) = self.store.save_caption(&ctx.display_name, locale, &srt) {
                        error!(
                            "[标签页 {}] ❌ 字幕保存失败 ({:?}) {}: {}",
                            tab_index, locale, ctx, e
                        );
                    }
                }
                Ok(None) => {
                    warn!(
                        "[标签页 {}] ⚠️ 字幕下载失败 ({:?}) {}",
                        tab_index, locale, ctx
                    );
                }
                Err(e) => {
                    error!(
                        "[标签页 {}] ❌ 字幕下载出错 ({:?}) {}: {}",
                        tab_index, locale, ctx, e
                    );
                }
            }
        }
    }
}
