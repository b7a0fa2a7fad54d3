extern crate actix;

use actix::{Actor, System};
use barberia::actors::{self, BarberShop};
use barberia::arrivals::{ArrivalSource, UniformGaps};
use barberia::{Cli, LogSink};
use clap::Parser;
use log::info;

// La barbería dormilona con actores: la barbería es un actor que recibe dos
// tipos de mensajes (llega un cliente, un barbero terminó) y los procesa de a
// uno. Los barberos son actores que cortan el pelo y avisan al terminar.
// Las llegadas son una tarea aparte que duerme un rato al azar entre cliente y cliente.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Abriendo la barbería: {} barberos, {} sillas, cortes de {} ms",
        config.barbers, config.hall_seats, config.cutting_time_ms
    );

    //creación explícita del sistema
    let sys = System::new();
    let snapshot = sys.block_on(async {
        let shop = BarberShop::new(&config, LogSink).start();

        //el generador de clientes corre en su propia tarea
        let arrivals = ArrivalSource::new(UniformGaps::from_config(&config)?);
        actix_rt::spawn(arrivals.run(shop.clone()));

        //dejamos la barbería abierta el tiempo pedido y después pedimos el resumen
        actix_rt::time::sleep(config.run_for()).await;
        actors::snapshot(&shop).await
    })?;

    println!("[Barbería] Cerramos: {}", snapshot.stats);
    println!(
        "[Barbería] Quedaron {} clientes en la sala y {} en la silla",
        snapshot.waiting.len(),
        snapshot.in_service.len()
    );
    Ok(())
}
