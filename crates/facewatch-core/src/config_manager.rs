//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리에 JSON 파일로 설정을 저장/로드한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 관리자
///
/// 설정 파일의 로드/저장을 담당한다. 실행 중 설정은 컨트롤러가 소유하므로
/// 내부 가변 상태를 두지 않는다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 로드된 설정
    config: AppConfig,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로에서 설정 로드
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn new() -> Result<Self, CoreError> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        Self::with_path(config_path)
    }

    /// 지정된 경로로 설정 관리자 생성
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = AppConfig::default_config();
            Self::save_to_file(&config_path, &default_config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            default_config
        };

        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// 특정 필드만 업데이트하고 파일에 저장
    pub fn update_with<F>(&mut self, updater: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.clone();
        updater(&mut config);
        config.validate()?;
        Self::save_to_file(&self.config_path, &config)?;
        debug!("설정 저장 완료: {}", self.config_path.display());
        self.config = config.clone();
        Ok(config)
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 다시 로드
    pub fn reload(&mut self) -> Result<(), CoreError> {
        let config = Self::load_from_file(&self.config_path)?;
        config.validate()?;
        self.config = config;
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리 경로
    ///
    /// - macOS: `~/Library/Application Support/com.facewatch.facewatch/`
    /// - Windows: `%APPDATA%\facewatch\facewatch\config\`
    /// - Linux: `~/.config/facewatch/`
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("com", "facewatch", "facewatch")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    /// 파일에서 설정 로드
    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 파일에 설정 저장
    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guard::ReturnPolicy;
    use tempfile::TempDir;

    #[test]
    fn create_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());

        let config = manager.get();
        assert_eq!(config.idle.idle_threshold_secs, 10);
    }

    #[test]
    fn update_and_persist_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let mut manager = ConfigManager::with_path(config_path.clone()).unwrap();
        manager
            .update_with(|c| {
                c.idle.shutdown_countdown_secs = 60;
                c.idle.return_policy = ReturnPolicy::Pause;
            })
            .unwrap();

        let manager2 = ConfigManager::with_path(config_path).unwrap();
        let config = manager2.get();
        assert_eq!(config.idle.shutdown_countdown_secs, 60);
        assert_eq!(config.idle.return_policy, ReturnPolicy::Pause);
    }

    #[test]
    fn invalid_update_is_not_saved() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::with_path(config_path.clone()).unwrap();
        let result = manager.update_with(|c| c.idle.shutdown_countdown_secs = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().idle.shutdown_countdown_secs, 30);

        let reloaded = ConfigManager::with_path(config_path).unwrap();
        assert_eq!(reloaded.get().idle.shutdown_countdown_secs, 30);
    }

    #[test]
    fn reload_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut manager = ConfigManager::with_path(config_path.clone()).unwrap();

        let mut config = manager.get();
        config.camera.device_index = 2;
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.get().camera.device_index, 2);
    }

    #[test]
    fn broken_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();

        let result = ConfigManager::with_path(config_path);
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
