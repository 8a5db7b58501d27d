use log::info;
use timeshift_runner::{RunnerConfig, TimeShiftApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RunnerConfig::load(|key| std::env::var(key).ok())?;

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting timeshift runner...");

    let app = TimeShiftApp::from_config(&config)?;
    let report = app.run().await;

    println!("virtual now : {}", report.virtual_now.to_rfc3339());
    println!("real now    : {}", report.real_now.to_rfc3339());
    println!("offset      : {}ms", report.offset_millis);
    if let Some(expired) = report.expired {
        println!("expired     : {}", expired);
    }
    println!("month end   : {}", report.month_end_due);

    Ok(())
}
