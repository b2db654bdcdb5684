use std::net::{IpAddr, SocketAddr};

use hitcounter::{AppState, app, cache, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        "Store backend: {:?}, bot filter: {}, throttle: {}, default key: {}",
        config.store_backend,
        config.bot_filter,
        config.throttle,
        config.default_key
    );

    // 创建存储后端
    let store = cache::from_config(&config).expect("Failed to create store");

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );

    let app = app(AppState::new(store, config));

    // 启动服务器
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
