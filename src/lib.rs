//! # Course Transcript Export
//!
//! 一个通过真实浏览器会话批量导出在线课程字幕稿的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 唯一的 page owner，提供导航 / 执行 JS / 等待元素能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单一职责
//! - `CurriculumPager` - 课程目录分页拉取能力
//! - `build_course_structure` - 目录结构重建（纯函数）
//! - `CourseIdResolver` - 课程 ID 多策略解析能力
//! - `OutputStore` - 输出文件写入 / 断点续传判断能力
//! - `render_contents` - 课程目录报告渲染（纯函数）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一节课"的完整处理流程
//! - `LectureCtx` - 上下文封装（章节序号 + 课时序号 + 显示名）
//! - `LectureFlow` - 流程编排（跳过已完成 → 导航 → 打开字幕稿面板 → 提取 → 保存 → 字幕文件）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/harvester` - 多标签页并行采集器，轮询分片 + 每个标签页内顺序处理
//! - `orchestrator/app` - 应用入口，管理浏览器资源和整体流程
//!
//! ## 纯函数模块
//! - `subtitle` - VTT → SRT 字幕格式转换（无副作用，可独立测试）

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod subtitle;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser;
pub use config::Config;
pub use error::AppError;
pub use infrastructure::PageDriver;
pub use models::{CourseStructure, CurriculumItem};
pub use orchestrator::{App, RunOptions};
pub use workflow::{LectureCtx, LectureFlow, LectureOutcome};
