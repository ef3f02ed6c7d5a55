use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// 已保存上传文件的元数据
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// 客户端提交的原始文件名
    pub original_name: String,
    /// 磁盘上的文件名（UUID + 原扩展名）
    pub saved_name: String,
    pub saved_path: String,
    /// 文件字节数
    pub size: usize,
    /// 保存时间（RFC 3339）
    pub upload_time: String,
}

/// 上传文件存储
///
/// 文件以随机 UUID 命名，避免与已有文件或客户端提供的路径冲突。
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 将内容写入存储目录，目录不存在时自动创建
    pub async fn save(&self, original_name: &str, content: &[u8]) -> anyhow::Result<StoredFile> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            anyhow::anyhow!("Failed to create upload dir {:?}: {}", self.root, e)
        })?;

        let saved_name = format!("{}{}", Uuid::new_v4(), extension_of(original_name));
        let path = self.root.join(&saved_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write upload {:?}: {}", path, e))?;

        info!("[Upload] stored '{}' as {:?}", original_name, path);

        Ok(StoredFile {
            original_name: original_name.to_string(),
            saved_name,
            saved_path: path.to_string_lossy().into_owned(),
            size: content.len(),
            upload_time: chrono::Local::now().to_rfc3339(),
        })
    }
}

/// 带前导点的扩展名，保留原大小写；无扩展名时返回空串
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|value| value.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extension_keeps_dot_and_case() {
        assert_eq!(extension_of("data.json"), ".json");
        assert_eq!(extension_of("DATA.JSON"), ".JSON");
        assert_eq!(extension_of("archive.tar.json"), ".json");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".json"), "");
    }

    #[tokio::test]
    async fn save_writes_under_root_with_uuid_name() {
        let temp_dir = tempdir().expect("tempdir");
        let store = UploadStore::new(temp_dir.path().join("nested/uploads"));

        let stored = store
            .save("report.json", "{\"名称\":1}".as_bytes())
            .await
            .expect("save");

        assert_eq!(stored.original_name, "report.json");
        assert!(stored.saved_name.ends_with(".json"));
        assert_eq!(stored.saved_name.len(), 36 + ".json".len());
        assert_eq!(stored.size, "{\"名称\":1}".len());

        let written = std::fs::read_to_string(store.root().join(&stored.saved_name)).expect("read");
        assert_eq!(written, "{\"名称\":1}");
    }
}
