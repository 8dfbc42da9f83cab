#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = assessment_hub::run().await {
        eprintln!("assessment-hub fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
