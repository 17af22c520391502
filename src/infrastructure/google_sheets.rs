//! Google Sheets v4 REST 客户端
//!
//! 使用服务账号凭据签发 RS256 JWT，换取 OAuth 访问令牌后调用 values 接口。
//! 令牌缓存在客户端内，过期前一分钟刷新。

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::sheet_backend::{column_letter, SheetBackend, SheetsError};
use crate::config::SheetsConfig;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// 追加行按原样写入，以 `=` 开头的文本不会被当作公式
const APPEND_QUERY: [(&str, &str); 2] = [
    ("valueInputOption", "RAW"),
    ("insertDataOption", "INSERT_ROWS"),
];

/// 服务账号凭据文件中用到的字段
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: Vec<Vec<&'a str>>,
}

/// Google Sheets 客户端
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    credentials: ServiceAccountKey,
    encoding_key: EncodingKey,
    spreadsheet_id: String,
    sheet_name: String,
    range: String,
    api_base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheetsClient {
    /// 读取凭据并完成首次令牌交换
    ///
    /// 凭据文件缺失、格式错误或令牌交换失败都会返回错误，调用方应当终止启动。
    pub async fn authenticate(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let raw = tokio::fs::read_to_string(&config.credentials_path)
            .await
            .map_err(|source| SheetsError::CredentialsRead {
                path: config.credentials_path.clone(),
                source,
            })?;

        let credentials: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| SheetsError::CredentialsInvalid(e.to_string()))?;

        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| SheetsError::CredentialsInvalid(format!("私钥无效: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let client = Self {
            http,
            credentials,
            encoding_key,
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            range: config.range.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        };

        client.access_token().await?;
        info!(
            "Google Sheets 认证成功，服务账号: {}, 表格: {}",
            client.credentials.client_email, client.spreadsheet_id
        );

        Ok(client)
    }

    /// 获取有效的访问令牌，必要时刷新
    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(cached.value.clone());
            }
        }

        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<CachedToken, SheetsError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.credentials.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.credentials.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.credentials.private_key_id.clone();
        let assertion = encode(&header, &claims, &self.encoding_key)?;

        debug!("请求新的访问令牌: {}", self.credentials.token_uri);
        let response = self
            .http
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let token: TokenResponse = response.json().await?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    /// 带工作表名的 A1 范围
    fn a1_range(&self, cells: &str) -> String {
        format!("'{}'!{}", self.sheet_name.replace('\'', "''"), cells)
    }

    fn values_url(&self, a1_range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base_url,
            self.spreadsheet_id,
            urlencoding::encode(a1_range)
        )
    }
}

#[async_trait]
impl SheetBackend for GoogleSheetsClient {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.access_token().await?;
        let url = self.values_url(&self.a1_range(&self.range));

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let response = check_status(response).await?;
        let body: ValueRange = response.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = format!("{}:append", self.values_url(&self.a1_range(&self.range)));
        let body = ValueRangeBody {
            values: vec![row.iter().map(String::as_str).collect()],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&APPEND_QUERY)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_cell(
        &self,
        row: u32,
        column: usize,
        value: String,
    ) -> Result<(), SheetsError> {
        if row == 0 {
            return Err(SheetsError::RowOutOfRange(row));
        }

        let token = self.access_token().await?;
        let cell = self.a1_range(&format!("{}{}", column_letter(column), row));
        let url = self.values_url(&cell);
        let body = ValueRangeBody {
            values: vec![vec![value.as_str()]],
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), SheetsError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v4/spreadsheets/{}",
            self.api_base_url, self.spreadsheet_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("fields", "spreadsheetId")])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("Google API 请求失败: {} {}", status, body);
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

/// 单元格值统一转为字符串，空值为空串
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
