use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RUST_LOG 優先，否則只開本 crate 的 log
fn store_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("address_search=debug,info")
        } else {
            EnvFilter::new("address_search=info")
        }
    })
}

/// 本機執行：精簡的單行輸出
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(store_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 容器部署：JSON 格式方便 log 收集
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(store_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .with_current_span(false),
        )
        .init();
}
