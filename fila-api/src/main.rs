use fila_api::client::{BookingApi, HttpBookingApi};
use fila_domain::flight::group_by_circuito;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Smoke tool: loads the config, hits the live backend and prints the
/// available flights grouped by circuit.
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fila_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = fila_api::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Querying {}", config.api.base_url);

    let api = HttpBookingApi::new(config.api.base_url);

    let price = api.ticket_price().await.expect("Failed to fetch price");
    println!("Precio por ticket: ${}", price.precio_ticket);

    let flights = api
        .list_available_flights()
        .await
        .expect("Failed to fetch flights");

    for (circuito, group) in group_by_circuito(&flights) {
        println!("Circuito {circuito}:");
        for flight in group {
            println!(
                "  {} {} — {} cupos ({})",
                flight.aircraft.matricula,
                flight.aircraft.modelo,
                flight.cupos_disponibles(),
                flight.fecha_hora,
            );
        }
    }
}
