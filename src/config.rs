use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::analysis::{Limits, MAX_DEPTH_LIMIT};

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub parser: ParserSettings,
}

/// 服务相关配置（监听地址、端口、请求超时）
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// 单个请求允许的最长处理时间（单位：秒）
    pub request_timeout_secs: u64,
}

/// JSON 解析与上传相关限制
#[derive(Debug, Deserialize, Clone)]
pub struct ParserSettings {
    /// 最大嵌套深度，根节点为 1
    pub max_depth: usize,
    /// 所有对象键值对的总数上限
    pub max_keys: usize,
    /// 上传文件大小上限（单位：字节），仅作用于上传接口
    pub max_file_size: usize,
    /// 允许上传的扩展名（含前导点，小写比较）
    pub allowed_extensions: Vec<String>,
    /// 上传文件的保存目录
    pub upload_path: PathBuf,
}

impl ParserSettings {
    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth,
            max_keys: self.max_keys,
        }
    }
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.request_timeout_secs", 30)?
        .set_default("parser.max_depth", 10)?
        .set_default("parser.max_keys", 1000)?
        // 默认限制 10MB
        .set_default("parser.max_file_size", 10 * 1024 * 1024)?
        .set_default("parser.allowed_extensions", vec![".json".to_string()])?
        .set_default("parser.upload_path", "json_uploads")?)
}

impl Settings {
    /// 加载配置：支持默认值、可选配置文件、环境变量覆盖
    pub fn new() -> anyhow::Result<Self> {
        let builder = with_defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("JSON_INSPECT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("parser.allowed_extensions"),
            );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 仅使用内置默认值，不读取配置文件与环境变量
    pub fn defaults() -> anyhow::Result<Self> {
        let settings: Settings = with_defaults()?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be at least 1");
        }
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.parser.max_depth) {
            anyhow::bail!(
                "parser.max_depth must be between 1 and {}",
                MAX_DEPTH_LIMIT
            );
        }
        if self.parser.max_file_size == 0 {
            anyhow::bail!("parser.max_file_size must be at least 1 byte");
        }
        if let Some(ext) = self
            .parser
            .allowed_extensions
            .iter()
            .find(|ext| !ext.starts_with('.'))
        {
            anyhow::bail!(
                "parser.allowed_extensions entry '{}' must start with '.'",
                ext
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::defaults().expect("settings");
        assert_eq!(settings.parser.limits(), Limits::default());
        assert_eq!(settings.parser.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.parser.allowed_extensions, vec![".json".to_string()]);
        assert_eq!(settings.server.request_timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut settings = Settings::defaults().expect("settings");
        settings.parser.max_depth = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::defaults().expect("settings");
        settings.parser.allowed_extensions = vec!["json".to_string()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut settings = Settings::defaults().expect("settings");
        settings.server.request_timeout_secs = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn validate_bounds_max_depth() {
        let mut settings = Settings::defaults().expect("settings");
        settings.parser.max_depth = MAX_DEPTH_LIMIT;
        assert!(settings.validate().is_ok());

        settings.parser.max_depth = MAX_DEPTH_LIMIT + 1;
        assert!(settings.validate().is_err());
    }
}
