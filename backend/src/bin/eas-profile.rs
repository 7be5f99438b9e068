/// Print the EAS build profile of an event, ready to merge into eas.json
///
/// Usage: eas-profile EVENT_ID [--app-config] [--api-url URL]
///   --app-config : print the generated app.json instead of the profile

use anyhow::Context;
use clap::Parser;

use oninvite_cms::services::{
    api_client::BackendClient,
    eas::{app_config, eas_profile, BuildEvent},
};

#[derive(Parser)]
#[command(name = "eas-profile", about = "Generate the EAS build profile of an Oninvite event")]
struct Args {
    /// Event id on the event API
    event_id: String,

    /// Print the Expo app.json instead of the EAS profile
    #[arg(long)]
    app_config: bool,

    #[arg(long, env = "API_URL", default_value = "https://api.oninvite.fr")]
    api_url: String,

    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "EAS_PROJECT_ID")]
    eas_project_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = BackendClient::new(&args.api_url, &args.api_key);

    let record = client
        .get_event(&args.event_id)
        .await
        .with_context(|| format!("Failed to fetch event {}", args.event_id))?;
    tracing::info!("Loaded event {}", record.id);

    let output = if args.app_config {
        app_config(&BuildEvent::from_record(record), &args.api_url, args.eas_project_id.as_deref())
    } else {
        serde_json::to_value(eas_profile(&record, &args.api_url))?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
