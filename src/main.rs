use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use warehouse_inventory::app::inventory::layout;
use warehouse_inventory::config::{load_config, ConfigSource, SheetBackendKind};
use warehouse_inventory::infrastructure::{
    logger::init_logging, GoogleSheetsClient, MemorySheet, SheetBackend,
};
use warehouse_inventory::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_config().context("加载配置失败")?;
    config.validate().context("配置无效")?;

    // 初始化日志，guard 持有到进程结束
    let _guard = init_logging(&config.logging).context("初始化日志失败")?;

    match &source {
        ConfigSource::File(path) => info!("从配置文件加载: {}", path.display()),
        ConfigSource::Default => info!("未找到配置文件，使用默认配置"),
    }

    info!("启动仓库库存服务...");

    let backend: Arc<dyn SheetBackend> = match config.sheets.backend {
        SheetBackendKind::Google => Arc::new(
            GoogleSheetsClient::authenticate(&config.sheets)
                .await
                .context("Google Sheets 认证失败")?,
        ),
        SheetBackendKind::Memory => {
            warn!("使用内存表格后端，数据不会持久化");
            Arc::new(MemorySheet::with_rows(vec![layout::header_row()]))
        }
    };

    let state = AppState::from_config(backend, &config);
    let app = build_app(state, &config);

    let addr = format!("{}:{}", config.http.bind_address, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 仓库库存服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   POST   /api/auth/login              - 登录");
    info!("   GET    /api/products                - 产品列表 (search, company)");
    info!("   POST   /api/products/search         - 搜索产品");
    info!("   POST   /api/products/add            - 新增产品");
    info!("   POST   /api/products/:id/withdraw   - 出库");
    info!("   GET    /api/kpi                     - 仪表盘指标");
    info!("   POST   /api/sync                    - 手动同步");
    info!("   GET    /api/health                  - 健康检查");

    axum::serve(listener, app).await.context("服务器运行失败")?;
    Ok(())
}
