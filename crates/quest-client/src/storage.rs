//! 客户端本地状态
//!
//! 只持久化访问 token 和少量界面偏好，其余数据都以服务端为准。

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// 界面偏好
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    /// 悬浮组件是否最小化
    #[serde(default)]
    pub widget_minimized: bool,
    /// 不再显示欢迎弹窗
    #[serde(default)]
    pub hide_welcome_dialog: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default)]
    preferences: UiPreferences,
}

/// 本地状态存储
pub trait ClientStorage: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn set_access_token(&self, token: &str) -> Result<()>;

    fn clear_access_token(&self) -> Result<()>;

    fn preferences(&self) -> UiPreferences;

    fn set_preferences(&self, preferences: UiPreferences) -> Result<()>;

    fn has_token(&self) -> bool {
        self.access_token().is_some()
    }
}

/// 进程内存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<StoredState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            state: RwLock::new(StoredState {
                access_token: Some(token.to_string()),
                ..Default::default()
            }),
        }
    }
}

impl ClientStorage for MemoryStorage {
    fn access_token(&self) -> Option<String> {
        self.state.read().access_token.clone()
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.state.write().access_token = Some(token.to_string());
        Ok(())
    }

    fn clear_access_token(&self) -> Result<()> {
        self.state.write().access_token = None;
        Ok(())
    }

    fn preferences(&self) -> UiPreferences {
        self.state.read().preferences
    }

    fn set_preferences(&self, preferences: UiPreferences) -> Result<()> {
        self.state.write().preferences = preferences;
        Ok(())
    }
}

/// JSON 文件存储
///
/// 每次修改都先写临时文件再 rename，文件不会出现写了一半的内容
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    state: RwLock<StoredState>,
}

impl FileStorage {
    /// 打开状态文件，文件不存在时视为空状态
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredState::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "本地状态已加载");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modify(&self, f: impl FnOnce(&mut StoredState)) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        f(&mut next);
        persist(&self.path, &next)?;
        *state = next;
        Ok(())
    }
}

fn persist(path: &Path, state: &StoredState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
    std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

impl ClientStorage for FileStorage {
    fn access_token(&self) -> Option<String> {
        self.state.read().access_token.clone()
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.modify(|s| s.access_token = Some(token.to_string()))
    }

    fn clear_access_token(&self) -> Result<()> {
        self.modify(|s| s.access_token = None)
    }

    fn preferences(&self) -> UiPreferences {
        self.state.read().preferences
    }

    fn set_preferences(&self, preferences: UiPreferences) -> Result<()> {
        self.modify(|s| s.preferences = preferences)
    }
}
