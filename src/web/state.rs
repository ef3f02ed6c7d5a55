use crate::analysis::Limits;
use crate::config::Settings;
use crate::storage::UploadStore;

/// Web 应用全局状态
///
/// 职责：保存启动时加载的只读配置与上传存储，通过 Arc 注入到 Axum 的 Handler 中。
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let uploads = UploadStore::new(settings.parser.upload_path.clone());
        Self { settings, uploads }
    }

    /// 当前请求使用的结构上限
    pub fn limits(&self) -> Limits {
        self.settings.parser.limits()
    }
}
