#[tokio::main]
async fn main() {
    if let Err(err) = gj_api::run().await {
        tracing::error!(error = %err, "gj-api failed");
        std::process::exit(1);
    }
}
