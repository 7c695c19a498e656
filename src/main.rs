#[tokio::main]
async fn main() -> anyhow::Result<()> {
    media_downloader_lib::run().await
}
