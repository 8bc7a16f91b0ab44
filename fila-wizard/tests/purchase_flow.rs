use chrono::Utc;
use fila_api::{BusinessRules, DataCache, MockBookingApi};
use fila_authorization::{attach_artifact, RawArtifact, MAX_ARTIFACT_BYTES};
use fila_domain::{Aircraft, FlightOption, Passenger};
use fila_reservation::storage::read_hold_keys;
use fila_reservation::MemoryKeyStore;
use fila_wizard::{WizardController, WizardError, WizardStep};
use std::sync::Arc;
use uuid::Uuid;

fn flight(capacidad: u32, ocupados: u32) -> FlightOption {
    FlightOption {
        id: Uuid::new_v4(),
        aircraft: Aircraft {
            matricula: "CC-KSM".to_string(),
            modelo: "Piper Cherokee".to_string(),
        },
        numero_circuito: 2,
        fecha_hora: Utc::now() + chrono::Duration::hours(3),
        hora_prevista_salida: Some("12:15".to_string()),
        capacidad_total: capacidad,
        asientos_ocupados: ocupados,
    }
}

fn adult(nombre: &str, rut: &str) -> Passenger {
    Passenger {
        nombre: nombre.to_string(),
        apellido: "Fuentes".to_string(),
        rut: rut.to_string(),
        ..Passenger::default()
    }
}

fn small_pdf() -> RawArtifact {
    RawArtifact {
        file_name: "autorizacion_firmada.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: vec![0x25; 64 * 1024],
    }
}

async fn wizard_at_flight_step(
    api: Arc<MockBookingApi>,
    store: Arc<MemoryKeyStore>,
    pasajeros: Vec<Passenger>,
) -> WizardController {
    let mut wizard = WizardController::new(
        api,
        store,
        Arc::new(DataCache::new()),
        &BusinessRules::default(),
    );
    wizard
        .set_cantidad_pasajeros(pasajeros.len() as u32)
        .unwrap();
    wizard.advance().await.unwrap();
    wizard.set_buyer("compras@example.cl", "Carmen Fuentes", None);
    wizard.advance().await.unwrap();
    for (i, p) in pasajeros.into_iter().enumerate() {
        *wizard.passenger_mut(i).unwrap() = p;
    }
    wizard.advance().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Flight);
    wizard
}

/// Two complete adults pass the Step3 gate, but a flight with a
/// single open seat is rejected at Step4 before any hold request goes out.
#[tokio::test]
async fn test_insufficient_seats_never_reach_the_server() {
    let api = Arc::new(MockBookingApi::new().with_flights(vec![flight(3, 2)]));
    let store = Arc::new(MemoryKeyStore::new());
    let pasajeros = vec![adult("Carmen", "10.111.222-3"), adult("Diego", "12.333.444-5")];

    let mut wizard = wizard_at_flight_step(api.clone(), store, pasajeros).await;

    let flight_id = wizard.flights()[0].id;
    let err = wizard.select_flight(flight_id).unwrap_err();
    assert!(matches!(
        err,
        WizardError::InsufficientSeats {
            requested: 2,
            available: 1
        }
    ));

    let err = wizard.advance().await.unwrap_err();
    assert!(matches!(err, WizardError::NoFlightSelected));

    assert_eq!(wizard.step(), WizardStep::Flight);
    assert_eq!(api.create_reservation_calls(), 0);
}

/// An unauthorized minor blocks the Step3 gate; attaching a
/// valid PDF flips it without touching the other passenger's data.
#[tokio::test]
async fn test_minor_authorization_flips_the_gate() {
    let api = Arc::new(MockBookingApi::new().with_flights(vec![flight(3, 0)]));
    let store = Arc::new(MemoryKeyStore::new());
    let mut wizard = WizardController::new(
        api,
        store,
        Arc::new(DataCache::new()),
        &BusinessRules::default(),
    );

    wizard.set_cantidad_pasajeros(2).unwrap();
    wizard.advance().await.unwrap();
    wizard.set_buyer("compras@example.cl", "Carmen Fuentes", None);
    wizard.advance().await.unwrap();

    *wizard.passenger_mut(0).unwrap() = adult("Carmen", "10.111.222-3");
    let mut menor = adult("Benjamín", "23.456.789-0");
    menor.es_menor = true;
    *wizard.passenger_mut(1).unwrap() = menor;

    let err = wizard.advance().await.unwrap_err();
    assert!(matches!(err, WizardError::GateNotSatisfied { .. }));
    assert_eq!(wizard.step(), WizardStep::Passengers);

    let before = wizard.draft().pasajeros[0].clone();
    attach_artifact(wizard.passenger_mut(1).unwrap(), small_pdf(), MAX_ARTIFACT_BYTES).unwrap();
    assert_eq!(wizard.draft().pasajeros[0], before);

    wizard.advance().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Flight);
}

/// A 6 MB JPEG is rejected with the actual size in the message
/// and the passenger's prior authorization is untouched.
#[tokio::test]
async fn test_oversize_upload_keeps_previous_authorization() {
    let mut menor = adult("Benjamín", "23.456.789-0");
    menor.es_menor = true;
    attach_artifact(&mut menor, small_pdf(), MAX_ARTIFACT_BYTES).unwrap();
    let before = menor.clone();

    let oversized = RawArtifact {
        file_name: "foto_consentimiento.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        bytes: vec![0xFF; 6 * 1024 * 1024],
    };
    let err = attach_artifact(&mut menor, oversized, MAX_ARTIFACT_BYTES).unwrap_err();
    assert_eq!(
        err.to_string(),
        "El archivo pesa 6.00MB y el máximo permitido es 5MB."
    );
    assert_eq!(menor, before);
}

/// Happy path: hold created on Step4→5, both durable keys written, submit
/// hands off to the gateway and clears the keys unconditionally.
#[tokio::test]
async fn test_full_purchase_writes_and_clears_the_durable_keys() {
    let api = Arc::new(MockBookingApi::new().with_flights(vec![flight(3, 0)]));
    let store = Arc::new(MemoryKeyStore::new());
    let pasajeros = vec![adult("Carmen", "10.111.222-3")];

    let mut wizard = wizard_at_flight_step(api.clone(), store.clone(), pasajeros).await;

    let flight_id = wizard.flights()[0].id;
    wizard.select_flight(flight_id).unwrap();
    wizard.advance().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Confirm);
    assert_eq!(api.create_reservation_calls(), 1);

    let hold = wizard.hold().expect("hold must be live at Step5").clone();
    assert_eq!(
        read_hold_keys(store.as_ref()),
        Some((hold.id, flight_id)),
        "both keys must be persisted on hold creation"
    );

    let redirect = wizard.submit().await.unwrap();
    assert!(redirect.to_html_form().contains("token_ws"));
    assert!(
        read_hold_keys(store.as_ref()).is_none(),
        "submit clears both keys unconditionally"
    );
}

/// A rejected payment keeps the keys: the hold is still live server-side.
#[tokio::test]
async fn test_payment_rejection_keeps_the_hold_keys() {
    let api = Arc::new(MockBookingApi::new().with_flights(vec![flight(3, 0)]));
    let store = Arc::new(MemoryKeyStore::new());
    let pasajeros = vec![adult("Carmen", "10.111.222-3")];

    let mut wizard = wizard_at_flight_step(api.clone(), store.clone(), pasajeros).await;
    let flight_id = wizard.flights()[0].id;
    wizard.select_flight(flight_id).unwrap();
    wizard.advance().await.unwrap();

    api.reject_payments("Transacción rechazada por el emisor");
    let err = wizard.submit().await.unwrap_err();
    assert_eq!(err.to_string(), "Transacción rechazada por el emisor");
    assert!(read_hold_keys(store.as_ref()).is_some());
}
