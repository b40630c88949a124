use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gatewayprobe::cmd::start().await
}
