#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rscms::run().await
}
