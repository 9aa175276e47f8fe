use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动一个新的浏览器实例（调试端口连不上时的兜底路径）
///
/// 注意：新实例没有已登录的会话，需要在弹出的窗口中手动登录。
pub async fn launch_browser() -> Result<(Browser, Page)> {
    info!("🚀 正在启动新的浏览器实例...");

    let mut builder = BrowserConfig::builder()
        .with_head() // 需要操作者手动登录，必须带界面
        .args(vec![
            "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage", // 防止共享内存不足
            "--disable-gpu",
        ]);

    // 可以用环境变量指定浏览器可执行文件
    if let Ok(path) = std::env::var("CHROME_PATH") {
        builder = builder.chrome_executable(std::path::Path::new(&path));
    }

    let config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        anyhow::anyhow!("配置浏览器失败: {}", e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        anyhow::anyhow!("创建页面失败: {}", e)
    })?;

    info!("✅ 浏览器已就绪");
    Ok((browser, page))
}
