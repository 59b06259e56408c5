//! Result aggregation and report rendering.
//!
//! The aggregator folds over the rendered per-account result lines rather
//! than structured outcomes: a line containing the success marker counts as
//! a success, anything else counts as a failure and contributes its
//! username (when extractable) to the failed list.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker scanned for when classifying a rendered result line as a success.
pub const SUCCESS_MARKER: &str = "登录成功";

/// Extracts the username from `账号（username）（server）...` lines.
static ACCOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("账号（(.+?)）").expect("account pattern is valid"));

/// Counts and failed-username list reduced from the result lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub success: usize,
    pub failure: usize,
    pub failed_accounts: Vec<String>,
}

/// Fold rendered result lines into summary counts and the ordered list of
/// failed usernames. A failing line that does not match the extraction
/// pattern still counts as a failure but is omitted from the named list.
pub fn summarize<'a, I>(lines: I) -> ReportSummary
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .fold(ReportSummary::default(), |mut summary, line| {
            if line.contains(SUCCESS_MARKER) {
                summary.success += 1;
            } else {
                summary.failure += 1;
                if let Some(captures) = ACCOUNT_PATTERN.captures(line) {
                    summary.failed_accounts.push(captures[1].to_string());
                }
            }
            summary
        })
}

/// Beijing wall-clock time: the instant shifted by a fixed +8 hours. A
/// display shift, not a timezone conversion.
pub fn beijing_time(now: DateTime<Utc>) -> NaiveDateTime {
    now.naive_utc() + Duration::hours(8)
}

/// Renders as `2025年01月02日 03时04分05秒`.
pub fn format_chinese_timestamp(t: NaiveDateTime) -> String {
    t.format("%Y年%m月%d日 %H时%M分%S秒").to_string()
}

/// Render the full report: title with Beijing timestamp, counts, per-account
/// lines in input order, and the failed-account list when any login failed.
pub fn format_report(now: DateTime<Utc>, lines: &[String]) -> String {
    let summary = summarize(lines.iter().map(String::as_str));
    let timestamp = format_chinese_timestamp(beijing_time(now));

    let title = format!("ct8&serv00 登陆报告（北京时间：{}）：", timestamp);
    let counts = format!("✅ 成功：{} 个\n❌ 失败：{} 个", summary.success, summary.failure);
    let details = lines.join("\n");

    let mut report = format!("{}\n{}\n\n{}", title, counts, details);

    if !summary.failed_accounts.is_empty() {
        let numbered: Vec<String> = summary
            .failed_accounts
            .iter()
            .enumerate()
            .map(|(i, username)| format!("{}. {}", i + 1, username))
            .collect();
        report.push_str("\n\n🔻 登录失败账号列表：\n");
        report.push_str(&numbered.join("\n"));
    }

    report
}
