use config::Config;
use std::env;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Install global log collector.
    tracing_subscriber::fmt::init();

    // Setup environment variables
    let config_path = env::var("CONFIG_PATH").expect("env variable CONFIG_PATH should be set");

    let app_config = Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()
        .and_then(|config| config.try_deserialize::<blockflow::config::AppConfig>())
        .unwrap_or_else(|err| {
            error!("{:?}", err);
            process::exit(1);
        });

    // Run blockflow service with the provided config.
    blockflow::app::App { config: app_config }
        .start()
        .await
        .unwrap_or_else(|err| {
            error!("{:?}", err);
            process::exit(1);
        });
}
