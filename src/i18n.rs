// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持西班牙语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::product::StockStatus;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"es" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use stock_lens::i18n::t;
/// let msg = t("import.error_title");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use stock_lens::i18n::t_with_args;
/// let msg = t_with_args("import.success", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 库存状态标签
pub fn stock_status_label(status: StockStatus) -> String {
    match status {
        StockStatus::InStock => t("stock.in_stock"),
        StockStatus::Low => t("stock.low"),
        StockStatus::OutOfStock => t("stock.out_of_stock"),
    }
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 涉及语言切换的测试需持有此锁。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("es");
        assert_eq!(current_locale(), "es");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("es");
        let msg = t_with_args("import.success", &[("count", "12")]);
        assert_eq!(msg, "Se importaron 12 productos correctamente");

        set_locale("en");
        let msg = t_with_args("import.success", &[("count", "12")]);
        assert_eq!(msg, "Imported 12 products successfully");

        set_locale("es");
    }

    #[test]
    fn test_stock_status_label() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("es");
        assert_eq!(stock_status_label(StockStatus::OutOfStock), "Sin stock");
    }
}
