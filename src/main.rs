#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bitebase::bootstrapper::run().await
}
