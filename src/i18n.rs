// ==========================================
// 生产进度看板 - 国际化 (i18n)
// ==========================================
// 使用 rust-i18n 库, 支持中文（默认）和英文
// 覆盖: 等级标签、CSV/报告列名、导入导出提示
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::Severity;

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
///
/// # 返回
/// - true: 已切换
/// - false: 不支持的语言, 保持当前语言
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        tracing::warn!("不支持的语言: {}", locale);
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use production_tracker::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use production_tracker::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/codes.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 等级标签
pub fn severity_label(severity: Severity) -> String {
    t(severity.i18n_key())
}
