use std::thread;

use barberia::arrivals::{ArrivalSource, UniformGaps};
use barberia::channels::ShopHandle;
use barberia::{Cli, LogSink};
use clap::Parser;
use log::info;

// Misma barbería pero con hilos: un hilo barbería que lee un único canal con
// múltiples escritores (el generador de clientes y cada corte en curso).
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Abriendo la barbería: {} barberos, {} sillas, cortes de {} ms",
        config.barbers, config.hall_seats, config.cutting_time_ms
    );

    let shop = ShopHandle::spawn(&config, LogSink);

    // le paso al generador su copia del canal
    let arrivals = ArrivalSource::new(UniformGaps::from_config(&config)?);
    let arrivals_sender = shop.sender();
    thread::spawn(move || arrivals.run_blocking(arrivals_sender));

    thread::sleep(config.run_for());
    let snapshot = shop.close()?;

    println!("[Barbería] Cerramos: {}", snapshot.stats);
    println!(
        "[Barbería] Quedaron {} clientes en la sala y {} en la silla",
        snapshot.waiting.len(),
        snapshot.in_service.len()
    );
    Ok(())
}
