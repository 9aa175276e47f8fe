use clap::Parser;
use course_transcript_export::orchestrator::{normalize_course_url, App, RunOptions};
use course_transcript_export::utils::prompt::{ConsolePrompt, Prompt};
use course_transcript_export::utils::logging;
use course_transcript_export::Config;
use tracing::error;

/// 通过真实浏览器会话批量导出在线课程的字幕稿
#[derive(Debug, Parser)]
#[command(name = "course_transcript_export")]
struct Cli {
    /// 课程页 URL
    course_url: String,

    /// 并行标签页数量（不传则交互询问，默认 5）
    #[arg(long)]
    tabs: Option<usize>,

    /// 是否同时导出字幕文件（不传则交互询问）
    #[arg(long)]
    subtitles: Option<bool>,

    /// 输出目录（覆盖配置文件）
    #[arg(long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load();
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }

    let prompt = ConsolePrompt;
    let options = resolve_options(&cli, &config, &prompt);

    if let Err(e) = run(config, options, &prompt).await {
        error!("❌ 运行失败: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config, options: RunOptions, prompt: &dyn Prompt) -> anyhow::Result<()> {
    let app = App::initialize(config, options).await?;
    let result = app.run(prompt).await;
    // 无论成功失败都回收浏览器资源
    app.shutdown().await;
    result
}

/// 合并 CLI 参数和交互提示，得到本次运行的选项
fn resolve_options(cli: &Cli, config: &Config, prompt: &dyn Prompt) -> RunOptions {
    let download_subtitles = cli
        .subtitles
        .unwrap_or_else(|| prompt.confirm("是否同时导出字幕文件？", false));

    let tab_count = cli.tabs.unwrap_or_else(|| {
        let answer = prompt.read_line(&format!(
            "并行标签页数量（回车默认 {}）:",
            config.default_tab_count
        ));
        answer.parse().unwrap_or(config.default_tab_count)
    });

    RunOptions {
        course_url: normalize_course_url(&cli.course_url),
        tab_count: tab_count.max(1),
        download_subtitles,
    }
}
