// ==========================================
// 库存查询工具 - 主入口
// ==========================================
// 技术栈: Rust + SQLite / Firestore
// 说明: 展示层不在本 crate 内；此入口只做启动自检
// ==========================================

use stock_lens::app::AppState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志系统
    stock_lens::logging::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{} - 库存查询", stock_lens::APP_NAME);
    tracing::info!("系统版本: {}", stock_lens::VERSION);
    tracing::info!("==================================================");

    tracing::info!("正在初始化AppState...");
    let app_state = AppState::from_env()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let total = runtime.block_on(app_state.product_api.count())?;

    println!("==================================================");
    println!("{} v{}", stock_lens::APP_NAME, stock_lens::VERSION);
    println!("后端: {}", app_state.product_api.backend_name());
    println!("检索模式: {:?}", app_state.config.search_mode);
    println!("商品数量: {}", total);
    println!("==================================================");
    println!();
    println!("导入 / 检索请使用: import_products import <file> | search <code> <description> | count");

    Ok(())
}
