//! Rusty-Send: send ATOM from a Keplr wallet on the Cosmos Hub

use eframe::egui;
use rusty_send_adapters::TransferAdapterConfig;

mod app;
mod bridge;
mod ui;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = TransferAdapterConfig::from_env();
    tracing::info!(
        chain_id = %config.chain.chain_id,
        profile = ?config.runtime_profile,
        "Starting Rusty-Send"
    );
    let bridge = bridge::TransferBridge::new(config)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Rusty-Send")
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty-Send",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, bridge)))),
    )
    .map_err(|e| eyre::eyre!("window exited with error: {e}"))
}
