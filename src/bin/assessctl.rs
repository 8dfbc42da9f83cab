#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = assessment_hub::run_cli().await {
        eprintln!("assessctl: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
