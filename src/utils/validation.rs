//! 输入验证工具函数
//!
//! 提供租户登记、记录编辑等场景的参数验证

use std::sync::OnceLock;

use regex::Regex;

/// 验证记录标识是否有效
///
/// # 参数
/// - `id`: 记录标识
///
/// # 返回
/// - `Ok(())`: 验证通过
/// - `Err(String)`: 错误信息
pub fn validate_record_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("记录标识不能为空".to_string());
    }
    if id.len() > 128 {
        return Err(format!("记录标识过长: {}", id.len()));
    }
    Ok(())
}

/// 验证电子邮箱格式
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    });

    if re.is_match(email.trim()) {
        Ok(())
    } else {
        Err(format!("无效的邮箱地址: {}", email))
    }
}

/// 验证 ИНН（纳税人识别号）
///
/// 法人为 10 位数字，个体经营者为 12 位数字
pub fn validate_inn(inn: &str) -> Result<(), String> {
    static INN_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = INN_PATTERN.get_or_init(|| Regex::new(r"^(\d{10}|\d{12})$").unwrap());

    if re.is_match(inn) {
        Ok(())
    } else {
        Err(format!("无效的 ИНН: {}（应为 10 或 12 位数字）", inn))
    }
}

/// 验证必填文本字段
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("字段 {} 不能为空", field));
    }
    Ok(())
}
