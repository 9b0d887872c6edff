#[tokio::main]
async fn main() -> anyhow::Result<()> {
    article_facade_lib::run().await
}
