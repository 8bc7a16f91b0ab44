use chrono::Datelike;
use fila_domain::{FlightOption, Passenger};

/// Printable consent form for a minor passenger. Pure and synchronous; the
/// caller turns it into a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentDocument {
    pub file_name: String,
    pub contents: String,
}

const BLANK: &str = "________________";

impl ConsentDocument {
    /// Pre-fill the minor's name and RUT, and the circuit/date when a flight
    /// is already chosen; leave blanks for manual completion otherwise.
    pub fn generate(minor: &Passenger, flight: Option<&FlightOption>) -> Self {
        let nombre = full_name_or_blank(minor);
        let rut = non_empty_or_blank(&minor.rut);
        let (circuito, fecha) = match flight {
            Some(f) => (
                f.numero_circuito.to_string(),
                format!(
                    "{:02}/{:02}/{}",
                    f.fecha_hora.day(),
                    f.fecha_hora.month(),
                    f.fecha_hora.year()
                ),
            ),
            None => (BLANK.to_string(), BLANK.to_string()),
        };

        let contents = format!(
            "AUTORIZACIÓN DE VUELO PARA MENOR DE EDAD\n\
             Club Aéreo — Fila Aérea\n\
             \n\
             Yo, {BLANK}, RUT {BLANK}, en calidad de padre/madre/tutor,\n\
             autorizo a {nombre}, RUT {rut}, a participar del vuelo en avión\n\
             del circuito N° {circuito} con fecha {fecha}.\n\
             \n\
             Declaro conocer las condiciones de la actividad y eximir de\n\
             responsabilidad al club por causas ajenas a la operación.\n\
             \n\
             Firma: {BLANK}\n\
             Fecha de firma: {BLANK}\n"
        );

        let slug = if minor.nombre.trim().is_empty() {
            "menor".to_string()
        } else {
            minor.nombre.trim().to_lowercase().replace(' ', "_")
        };
        Self {
            file_name: format!("autorizacion_{slug}.txt"),
            contents,
        }
    }
}

fn full_name_or_blank(p: &Passenger) -> String {
    let full = format!("{} {}", p.nombre.trim(), p.apellido.trim());
    if full.trim().is_empty() {
        BLANK.to_string()
    } else {
        full.trim().to_string()
    }
}

fn non_empty_or_blank(value: &str) -> String {
    if value.trim().is_empty() {
        BLANK.to_string()
    } else {
        value.trim().to_string()
    }
}
