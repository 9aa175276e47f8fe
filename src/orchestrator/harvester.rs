//! 多标签页并行采集器 - 编排层
//!
//! ## 职责
//!
//! 1. **任务展开**：把（章节，课时）和独立课时按顺序摊平成一个任务列表
//! 2. **轮询分片**：第 i 片拿第 i、i+n、i+2n... 个任务——交错分布让每个
//!    标签页拿到有代表性的一段，而不是整块连续区间
//! 3. **并发控制**：每片一个独立标签页，片内严格顺序，片间并发
//! 4. **故障隔离**：单个课时失败只记日志，不中断同片或他片的处理
//! 5. **汇合**：所有分片都跑完才算整体完成，汇总全局统计

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::CourseStructure;
use crate::services::OutputStore;
use crate::workflow::{LectureCtx, LectureFlow, LectureOutcome};

/// 全局采集统计
#[derive(Debug, Default, Clone, Copy)]
pub struct HarvestStats {
    pub saved: usize,
    pub skipped: usize,
    pub no_transcript: usize,
    pub empty: usize,
    pub failed: usize,
}

impl HarvestStats {
    fn absorb(&mut self, other: HarvestStats) {
        self.saved += other.saved;
        self.skipped += other.skipped;
        self.no_transcript += other.no_transcript;
        self.empty += other.empty;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.no_transcript + self.empty + self.failed
    }
}

/// 并行采集全部课时
///
/// 每个分片独占一个新标签页顺序处理，所有分片并发运行，
/// 全部跑完后汇总统计返回。
pub async fn harvest(
    browser: &Browser,
    structure: &CourseStructure,
    course_url: &str,
    download_subtitles: bool,
    tab_count: usize,
    config: &Config,
) -> Result<HarvestStats> {
    let jobs = flatten_jobs(structure);
    let partitions = partition_round_robin(&jobs, tab_count);

    log_harvest_start(jobs.len(), tab_count);

    let mut handles = Vec::new();
    for (tab_index, partition) in partitions.into_iter().enumerate() {
        if partition.is_empty() {
            continue;
        }

        let page = browser.new_page("about:blank").await?;
        let driver = PageDriver::new(page, config.settle_ms);
        let store = OutputStore::new(&config.output_dir)?;
        let flow = LectureFlow::new(
            driver,
            store,
            course_url.to_string(),
            download_subtitles,
            config,
        );

        let handle = tokio::spawn(run_partition(flow, partition, tab_index + 1));
        handles.push((tab_index + 1, handle));
    }

    // 等待所有分片完成
    let mut stats = HarvestStats::default();
    for (tab_index, handle) in handles {
        match handle.await {
            Ok(tab_stats) => stats.absorb(tab_stats),
            Err(e) => {
                error!("[标签页 {}] 任务执行失败: {}", tab_index, e);
            }
        }
    }

    log_harvest_complete(&stats);
    Ok(stats)
}

/// 分片循环对单个课时的处理入口
///
/// 线上实现是 [`LectureFlow`]；循环本身只依赖这个接口
trait LectureRunner {
    async fn run_one(&self, tab_index: usize, ctx: &LectureCtx) -> Result<LectureOutcome>;
    async fn finish(self);
}

impl LectureRunner for LectureFlow {
    async fn run_one(&self, tab_index: usize, ctx: &LectureCtx) -> Result<LectureOutcome> {
        self.run(tab_index, ctx).await
    }

    async fn finish(self) {
        LectureFlow::finish(self).await;
    }
}

/// 单个分片的顺序处理循环
///
/// 单课时的错误在这里被吞掉（记入 failed），保证后续课时继续处理
async fn run_partition<R: LectureRunner>(
    runner: R,
    jobs: Vec<LectureCtx>,
    tab_index: usize,
) -> HarvestStats {
    let total = jobs.len();
    let mut stats = HarvestStats::default();

    for (pos, ctx) in jobs.iter().enumerate() {
        info!(
            "[标签页 {}] ({}/{}) 开始处理 {}",
            tab_index,
            pos + 1,
            total,
            ctx
        );
        match runner.run_one(tab_index, ctx).await {
            Ok(LectureOutcome::Saved) => stats.saved += 1,
            Ok(LectureOutcome::SkippedExisting) => stats.skipped += 1,
            Ok(LectureOutcome::NoTranscript) => stats.no_transcript += 1,
            Ok(LectureOutcome::EmptyTranscript) => stats.empty += 1,
            Err(e) => {
                error!("[标签页 {}] ❌ 课时处理失败 {}: {:#}", tab_index, ctx, e);
                stats.failed += 1;
            }
        }
    }

    info!(
        "[标签页 {}] ✅ 分片处理完成: 保存 {} / 跳过 {} / 无字幕稿 {} / 空 {} / 失败 {}",
        tab_index, stats.saved, stats.skipped, stats.no_transcript, stats.empty, stats.failed
    );

    runner.finish().await;
    stats
}

/// 把课程结构摊平成有序任务列表：先按章节顺序，再接独立课时
pub fn flatten_jobs(structure: &CourseStructure) -> Vec<LectureCtx> {
    let mut jobs = Vec::with_capacity(structure.lecture_count());
    for chapter in &structure.chapters {
        for lecture in &chapter.lectures {
            jobs.push(LectureCtx::new(Some(chapter.index), lecture.clone()));
        }
    }
    for lecture in &structure.standalone {
        jobs.push(LectureCtx::new(None, lecture.clone()));
    }
    jobs
}

/// 轮询分片：第 i 片拿下标 i, i+count, i+2count... 的任务
///
/// count 为 0 时按 1 处理
pub fn partition_round_robin<T: Clone>(items: &[T], count: usize) -> Vec<Vec<T>> {
    let count = count.max(1);
    let mut partitions = vec![Vec::new(); count];
    for (index, item) in items.iter().enumerate() {
        partitions[index % count].push(item.clone());
    }
    partitions
}

// ========== 日志辅助函数 ==========

fn log_harvest_start(total: usize, tab_count: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始并行采集: {} 个课时 / {} 个标签页", total, tab_count);
    info!("{}", "=".repeat(60));
}

fn log_harvest_complete(stats: &HarvestStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 采集完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 保存: {}", stats.saved);
    info!("⏭️ 跳过（已存在）: {}", stats.skipped);
    info!("📭 无字幕稿: {}", stats.no_transcript);
    info!("🫙 文本为空: {}", stats.empty);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
}
