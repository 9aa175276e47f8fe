//! VTT → SRT 字幕格式转换
//!
//! 纯函数模块：去掉 WEBVTT 头部，按空行切分 cue 块，重新从 1 编号，
//! 并把时间戳统一规整为 `HH:MM:SS,mmm` 格式。

/// 把单个时间戳规整为 `HH:MM:SS,mmm`
///
/// - 缺失的小时 / 分钟位左补 "00"
/// - 不足两位的数字左补 0
/// - 毫秒不足三位右补 0，超出三位截断
///
/// 例：`"1:02.5"` → `"00:01:02,500"`
pub fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    let (clock, frac) = match raw.split_once(['.', ',']) {
        Some((clock, frac)) => (clock, frac),
        None => (raw, ""),
    };

    let mut parts: Vec<String> = clock.split(':').map(|p| format!("{:0>2}", p)).collect();
    while parts.len() < 3 {
        parts.insert(0, "00".to_string());
    }

    let millis: String = frac
        .chars()
        .filter(|c| c.is_ascii_digit())
        .chain(std::iter::repeat('0'))
        .take(3)
        .collect();

    format!("{}:{}:{},{}", parts[0], parts[1], parts[2], millis)
}

/// 把 VTT 字幕内容转换为 SRT
///
/// - 去掉开头的 WEBVTT 头部块
/// - cue 块按空行切分，输出时从 1 重新编号
/// - 不足两行（没有文本）的块视为损坏，直接丢弃
pub fn vtt_to_srt(vtt: &str) -> String {
    let normalized = vtt.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.trim_start_matches('\u{feff}');
    let body = if body.starts_with("WEBVTT") {
        match body.split_once("\n\n") {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        body
    };

    let mut out = String::new();
    let mut number = 0;

    for block in body.split("\n\n") {
        let lines: Vec<&str> = block.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() < 2 {
            continue;
        }

        // cue 块可能带一行编号 / 标识符，真正的时间轴行包含 "-->"
        let Some(timing_pos) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };
        if lines.len() - timing_pos < 2 {
            continue;
        }

        let (start, end) = match lines[timing_pos].split_once("-->") {
            Some(pair) => pair,
            None => continue,
        };
        // 结束时间后可能跟 cue 设置（如 align:start），只取第一个字段
        let end = end.split_whitespace().next().unwrap_or("");

        number += 1;
        out.push_str(&format!(
            "{}\n{} --> {}\n",
            number,
            normalize_timestamp(start),
            normalize_timestamp(end)
        ));
        for line in &lines[timing_pos + 1..] {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_pads_missing_components() {
        assert_eq!(normalize_timestamp("1:02.5"), "00:01:02,500");
        assert_eq!(normalize_timestamp("00:00:01.250"), "00:00:01,250");
        assert_eq!(normalize_timestamp("02.5"), "00:00:02,500");
        assert_eq!(normalize_timestamp("01:02:03"), "01:02:03,000");
    }

    #[test]
    fn normalize_truncates_long_fraction() {
        assert_eq!(normalize_timestamp("0:01.123456"), "00:00:01,123");
        assert_eq!(normalize_timestamp("1:02:03,7"), "01:02:03,700");
    }

    #[test]
    fn converts_two_cues_with_renumbering() {
        let vtt = "WEBVTT\n\n1:00.5 --> 1:02.5\n第一句\n\n0:01:03.000 --> 0:01:05.250\n第二句\n第二句续行\n";
        let srt = vtt_to_srt(vtt);
        let expected = "1\n00:01:00,500 --> 00:01:02,500\n第一句\n\n2\n00:01:03,000 --> 00:01:05,250\n第二句\n第二句续行\n\n";
        assert_eq!(srt, expected);
    }

    #[test]
    fn drops_malformed_blocks() {
        // 第二个块只有时间轴没有文本，应当被丢弃且不占用编号
        let vtt = "WEBVTT\n\n00:01.0 --> 00:02.0\n有文本\n\n00:03.0 --> 00:04.0\n\n00:05.0 --> 00:06.0\n也有文本\n";
        let srt = vtt_to_srt(vtt);
        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n2\n00:00:05,000 --> 00:00:06,000\n也有文本\n"));
        assert!(!srt.contains("00:00:03,000"));
    }

    #[test]
    fn handles_cue_identifier_and_settings() {
        let vtt = "WEBVTT\n\ncue-7\n00:01.0 --> 00:02.0 align:start position:0%\n带标识符\n";
        let srt = vtt_to_srt(vtt);
        assert_eq!(srt, "1\n00:00:01,000 --> 00:00:02,000\n带标识符\n\n");
    }

    #[test]
    fn strips_crlf_and_bom() {
        let vtt = "\u{feff}WEBVTT\r\n\r\n00:01.0 --> 00:02.0\r\nCRLF 内容\r\n";
        let srt = vtt_to_srt(vtt);
        assert_eq!(srt, "1\n00:00:01,000 --> 00:00:02,000\nCRLF 内容\n\n");
    }
}
