//! 交互式提示 - 窄接口
//!
//! 把控制台输入收窄成一个小 trait，这样依赖提示的重试循环
//! 可以用脚本化的假实现做测试，不需要真实终端。

use std::io::{self, BufRead, Write};

/// 交互式提示能力
pub trait Prompt {
    /// 是/否确认
    fn confirm(&self, message: &str, default_yes: bool) -> bool;

    /// 阻塞等待操作者按回车（"准备好了/重试"信号）
    fn wait(&self, message: &str);

    /// 读取一行输入
    fn read_line(&self, message: &str) -> String;
}

/// 控制台提示实现
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn confirm(&self, message: &str, default_yes: bool) -> bool {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        let answer = self.read_line(&format!("{} {}", message, hint));
        let answer = answer.trim().to_lowercase();
        if answer.is_empty() {
            return default_yes;
        }
        matches!(answer.as_str(), "y" | "yes" | "是")
    }

    fn wait(&self, message: &str) {
        print!("{} ", message);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }

    fn read_line(&self, message: &str) -> String {
        print!("{} ", message);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        line.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompt;
    use super::Prompt;

    #[test]
    fn scripted_answers_drive_confirm() {
        let prompt = ScriptedPrompt::new(vec!["y", "n", ""]);
        assert!(prompt.confirm("导出字幕？", false));
        assert!(!prompt.confirm("导出字幕？", true));
        // 空答案落回默认值
        assert!(prompt.confirm("导出字幕？", true));
    }

    #[test]
    fn wait_counts_retry_signals() {
        let prompt = ScriptedPrompt::new(vec![]);
        prompt.wait("重试前确认");
        prompt.wait("重试前确认");
        assert_eq!(*prompt.waits.lock().unwrap(), 2);
        // 答案耗尽后 read_line 返回空串
        assert_eq!(prompt.read_line("标签页数量:"), "");
    }
}
