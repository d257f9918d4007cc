use crate::config::types::Config;
use crate::error::Result;
use crate::platform::api::PlatformApiClient;
use crate::platform::api::types::RelaySummary;
use colored::Colorize;

fn colored_health(status: &str) -> String {
    match status {
        "healthy" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" => status.red().to_string(),
        _ => status.dimmed().to_string(),
    }
}

fn print_relay(relay: &RelaySummary) {
    println!(
        "  {:<24} {:<10} {:<10} {}",
        relay.relay_name.cyan(),
        colored_health(&relay.status),
        relay.queue_provider.as_deref().unwrap_or("-"),
        relay
            .last_heartbeat
            .as_deref()
            .map(|h| format!("last heartbeat {}", h))
            .unwrap_or_else(|| "no heartbeat yet".to_string())
            .dimmed()
    );
    println!("  {}", relay.relay_id.dimmed());
}

/// `relay-ctl relays`
pub async fn handle_relays(config: &Config, json: bool) -> Result<()> {
    let client = PlatformApiClient::new(&config.api)?;
    let list = client.list_relays().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.relays.is_empty() {
        println!("No relays registered. Run {} to provision one.", "relay-ctl deploy".cyan());
        return Ok(());
    }

    println!("\n{} ({})", "Relays".bold(), list.total);
    for relay in &list.relays {
        print_relay(relay);
    }
    Ok(())
}
