#[tokio::main]
async fn main() -> anyhow::Result<()> {
    insurance_forms::cli::main().await
}
