#[tokio::main]
async fn main() {
    postpilot_observability::init();

    let config = postpilot_gateway::GatewayConfig::from_env();
    let listen_addr = config.listen_addr.clone();
    let app = postpilot_gateway::build_app(config);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", listen_addr, e));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
