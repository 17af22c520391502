use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "WAREHOUSE_CONFIG";

/// 仓库服务配置结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 表格后端配置
    pub sheets: SheetsConfig,
    /// 库存业务配置
    pub inventory: InventoryConfig,
    /// 登录用户配置
    pub auth: AuthConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// HTTP 服务端口
    pub port: u16,
    /// 绑定地址
    pub bind_address: String,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志文件路径
    pub log_path: PathBuf,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 是否启用控制台输出
    pub console_output: bool,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 表格后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetBackendKind {
    /// Google Sheets v4 REST API
    Google,
    /// 进程内表格，用于本地开发
    Memory,
}

/// 表格后端配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub backend: SheetBackendKind,
    pub spreadsheet_id: String,
    /// 工作表（标签页）名称
    pub sheet_name: String,
    /// 读取的单元格范围，不含工作表名
    pub range: String,
    /// 服务账号凭据文件
    pub credentials_path: PathBuf,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

/// 库存业务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// 低于该数量计为低库存
    pub low_stock_threshold: u32,
    /// 公司简称 -> 全称
    pub company_aliases: BTreeMap<String, String>,
}

/// 登录用户配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "0.0.0.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./logs"),
            file_prefix: "warehouse".to_string(),
            console_output: true,
            level: "info".to_string(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            backend: SheetBackendKind::Google,
            spreadsheet_id: String::new(),
            sheet_name: "Inventory".to_string(),
            range: "A1:Z".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            api_base_url: "https://sheets.googleapis.com".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let mut company_aliases = BTreeMap::new();
        company_aliases.insert("CM".to_string(), "CMES".to_string());

        Self {
            low_stock_threshold: 10,
            company_aliases,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users: vec![
                UserEntry {
                    username: "admin".to_string(),
                    password: "admin".to_string(),
                    role: "admin".to_string(),
                },
                UserEntry {
                    username: "guest".to_string(),
                    password: "guest".to_string(),
                    role: "guest".to_string(),
                },
            ],
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证HTTP配置
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        // 验证表格配置
        if self.sheets.backend == SheetBackendKind::Google {
            if self.sheets.spreadsheet_id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "使用 google 后端时 spreadsheet_id 不能为空".to_string(),
                ));
            }
            if self.sheets.api_base_url.trim().is_empty() {
                return Err(ConfigError::Validation("api_base_url 不能为空".to_string()));
            }
        }
        if self.sheets.sheet_name.trim().is_empty() {
            return Err(ConfigError::Validation("工作表名称不能为空".to_string()));
        }
        if self.sheets.range.trim().is_empty() {
            return Err(ConfigError::Validation("单元格范围不能为空".to_string()));
        }
        // 行号即表格行号，列号从 A 开始，范围必须从 A1 起
        if !starts_at_a1(&self.sheets.range) {
            return Err(ConfigError::Validation(format!(
                "单元格范围必须从 A1 开始: {}",
                self.sheets.range
            )));
        }

        // 验证用户配置
        for user in &self.auth.users {
            if user.username.trim().is_empty() || user.role.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "用户名和角色不能为空".to_string(),
                ));
            }
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 判断 A1 范围的起点是否为第一列第一行，如 `A1:Z`、`A:Z`
fn starts_at_a1(range: &str) -> bool {
    let range = range.rsplit('!').next().unwrap_or(range);
    let start = range.split(':').next().unwrap_or_default().trim();
    let start = start.replace('$', "");
    let row = start.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let column = &start[..start.len() - row.len()];

    column.eq_ignore_ascii_case("a") && (row.is_empty() || row == "1")
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

/// 从文件或默认值加载配置
///
/// 查找顺序：`WAREHOUSE_CONFIG` 环境变量指定的文件，然后是
/// `config/warehouse.toml` 和 `warehouse.toml`，都不存在时使用默认配置。
/// 环境变量指向的文件不存在时直接报错。
pub fn load_config() -> Result<(Config, ConfigSource), ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        let config = Config::load_from_file(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    let config_paths = ["config/warehouse.toml", "warehouse.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            let config = Config::load_from_file(path)?;
            return Ok((config, ConfigSource::File(PathBuf::from(path))));
        }
    }

    Ok((Config::default(), ConfigSource::Default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.sheets.sheet_name, "Inventory");
        assert_eq!(config.sheets.range, "A1:Z");
        assert_eq!(config.inventory.low_stock_threshold, 10);
        assert_eq!(config.auth.users.len(), 2);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        // google 后端需要 spreadsheet_id
        assert!(config.validate().is_err());

        config.sheets.spreadsheet_id = "sheet-id".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_needs_no_spreadsheet_id() {
        let mut config = Config::default();
        config.sheets.backend = SheetBackendKind::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("warehouse.toml");
        fs::write(
            &config_path,
            r#"
                [http]
                port = 8080

                [sheets]
                spreadsheet_id = "abc"
                range = "A:Z"

                [[auth.users]]
                username = "alonso"
                password = "pw"
                role = "admin"
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.sheets.spreadsheet_id, "abc");
        assert_eq!(config.auth.users.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_range_must_start_at_a1() {
        let mut config = Config::default();
        config.sheets.backend = SheetBackendKind::Memory;

        for range in ["A1:Z", "A:Z", "$A$1:$L", "Inventory!A1:Z"] {
            config.sheets.range = range.to_string();
            assert!(config.validate().is_ok(), "{}", range);
        }

        // 起点偏移会让行号和列号错位
        for range in ["A2:Z", "B1:Z", "A10:L200", "2:5"] {
            config.sheets.range = range.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{}",
                range
            );
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml = r#"
            [sheets]
            backend = "memory"

            [inventory]
            low_stock_threshold = 3
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sheets.backend, SheetBackendKind::Memory);
        assert_eq!(config.sheets.sheet_name, "Inventory");
        assert_eq!(config.inventory.low_stock_threshold, 3);
        assert_eq!(
            config.inventory.company_aliases.get("CM").map(String::as_str),
            Some("CMES")
        );
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = Config::load_from_file(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
