use server::{init_tracing, launch, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let memory = std::env::args().any(|arg| arg == "--memory");
    let settings = Settings::new()?;
    launch(settings, memory).await
}
