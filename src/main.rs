use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use sacco_buddy::{
    bot::{self, BotData},
    config,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Lending limits from config.toml, or defaults
    let app_config = config::lending::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect to the database and make sure every table exists
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    if config::admins::get_admin_ids().is_empty() {
        info!("SACCO_ADMIN_IDS is not set; /admin commands are disabled");
    }

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: bot::all_commands(),
            on_error: |error| Box::pin(bot::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(db, app_config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting SaccoBuddy...");
    client.start().await?;

    Ok(())
}
