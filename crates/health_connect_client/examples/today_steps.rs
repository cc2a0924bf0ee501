use health_connect_client::{
    ReadRecordsOptions, StepsRecord, config::Config, http_client::ReqwestHealthClient, read_typed,
    utils,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects HEALTH_CONNECT_BRIDGE_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestHealthClient::from_config(&cfg);
    let now = chrono::Local::now();
    let steps: Vec<StepsRecord> =
        read_typed(&client, ReadRecordsOptions::new(utils::today_so_far(&now))).await?;
    println!(
        "Steps today: {} across {} records",
        steps.iter().map(|r| r.count).sum::<u64>(),
        steps.len()
    );
    Ok(())
}
