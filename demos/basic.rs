use edge_json_client::{status_line, EdgeClient};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = EdgeClient::from_env().map_err(anyhow::Error::msg)?;

    let health = client.get("/api/health").await;
    println!("GET /api/health: {}", status_line(&health));

    let answer = client
        .post(
            "/api/runbooks/ask",
            &json!({"question": "hello", "top_k": 5}),
        )
        .await;
    println!("POST /api/runbooks/ask: {}", status_line(&answer));

    let answer = answer?;
    println!("{}", serde_json::to_string_pretty(&answer.value)?);

    Ok(())
}
