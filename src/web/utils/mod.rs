pub mod errors;

/// 响应中使用的时间戳（本地时区，RFC 3339）
pub fn timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
