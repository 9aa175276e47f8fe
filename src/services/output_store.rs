//! 输出文件存储 - 业务能力层
//!
//! 以净化后的显示名为键写入输出文件。字幕稿文件的存在与否
//! 就是断点续传的唯一标记，不维护单独的状态文件。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

/// 显示名长度上限（字符数），防止超长标题撑爆文件系统限制
const MAX_NAME_CHARS: usize = 120;

/// 输出文件存储
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    /// 创建存储（输出目录不存在时自动创建）
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("无法创建输出目录: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 课时字幕稿文件路径
    pub fn transcript_path(&self, display_name: &str) -> PathBuf {
        self.root.join(format!("{}.txt", display_name))
    }

    /// 字幕稿文件是否已存在（断点续传标记）
    pub fn transcript_exists(&self, display_name: &str) -> bool {
        self.transcript_path(display_name).exists()
    }

    /// 写入字幕稿文件
    pub fn save_transcript(&self, display_name: &str, body: &str) -> Result<PathBuf> {
        let path = self.transcript_path(display_name);
        fs::write(&path, body).with_context(|| format!("写入文件失败: {}", path.display()))?;
        debug!("已写入字幕稿: {}", path.display());
        Ok(path)
    }

    /// 写入一条字幕文件（按语言标记区分，缺失时用 "unknown" 兜底）
    pub fn save_caption(
        &self,
        display_name: &str,
        locale: Option<&str>,
        srt: &str,
    ) -> Result<PathBuf> {
        let locale = locale.filter(|l| !l.is_empty()).unwrap_or("unknown");
        let path = self.root.join(format!("{}.{}.srt", display_name, locale));
        fs::write(&path, srt).with_context(|| format!("写入文件失败: {}", path.display()))?;
        debug!("已写入字幕: {}", path.display());
        Ok(path)
    }

    /// 写入报告类文件（如课程目录清单）
    pub fn save_report(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(filename);
        fs::write(&path, content).with_context(|| format!("写入文件失败: {}", path.display()))?;
        Ok(path)
    }
}

/// 由（章节序号，课时序号，标题）推导显示名
///
/// 独立课时不带章节前缀
pub fn display_name(chapter_index: Option<usize>, lecture_index: usize, title: &str) -> String {
    let raw = match chapter_index {
        Some(chapter) => format!("{}.{} {}", chapter, lecture_index, title),
        None => format!("{} {}", lecture_index, title),
    };
    sanitize_display_name(&raw)
}

/// 净化显示名：去掉文件系统非法字符和控制字符，折叠空白，限制长度
pub fn sanitize_display_name(raw: &str) -> String {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let illegal = ILLEGAL.get_or_init(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).unwrap());
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").unwrap());

    let cleaned = illegal.replace_all(raw, "");
    let collapsed = spaces.replace_all(&cleaned, " ");
    collapsed.trim().chars().take(MAX_NAME_CHARS).collect()
}
