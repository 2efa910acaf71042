#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let (app, addr) = cepu_client::server::app().expect("server configuration");
    let listener = tokio::net::TcpListener::bind(addr).await.expect("failed to bind");

    tracing::info!(%addr, "cepu-client listening");
    axum::serve(listener, app).await.expect("server failed");
}
