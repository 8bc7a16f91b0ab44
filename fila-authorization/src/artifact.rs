use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fila_domain::Passenger;

/// Default upload cap; deployments override it through the
/// `business_rules.max_artifact_bytes` config value.
pub const MAX_ARTIFACT_BYTES: usize = 5 * 1024 * 1024;

/// PDF plus the common image formats. The gate only checks for a non-empty
/// encoded payload, so acceptance here is the single signal it sees.
pub const ACCEPTED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
];

/// An authorization document as it came off the capture path, before
/// validation and encoding.
#[derive(Debug, Clone)]
pub struct RawArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArtifactError {
    #[error("Tipo de archivo no permitido ({0}). Sube un PDF o una imagen.")]
    UnsupportedType(String),

    #[error("El archivo pesa {size_mb:.2}MB y el máximo permitido es {limit_mb:.0}MB.")]
    TooLarge { size_mb: f64, limit_mb: f64 },

    #[error("El archivo está vacío.")]
    Empty,
}

/// Validate without mutating anything. Two calls with the same input give
/// the same answer. `max_bytes` comes from the business rules config.
pub fn validate_artifact(artifact: &RawArtifact, max_bytes: usize) -> Result<(), ArtifactError> {
    if !ACCEPTED_MIME_TYPES.contains(&artifact.mime_type.as_str()) {
        return Err(ArtifactError::UnsupportedType(artifact.mime_type.clone()));
    }
    if artifact.bytes.is_empty() {
        return Err(ArtifactError::Empty);
    }
    if artifact.bytes.len() > max_bytes {
        let mb = 1024.0 * 1024.0;
        return Err(ArtifactError::TooLarge {
            size_mb: artifact.bytes.len() as f64 / mb,
            limit_mb: max_bytes as f64 / mb,
        });
    }
    Ok(())
}

/// The one and only accept path, shared by every capture source: validate,
/// then attach the base64 payload and the original filename. On rejection
/// the passenger's previous authorization fields are left untouched.
pub fn attach_artifact(
    passenger: &mut Passenger,
    artifact: RawArtifact,
    max_bytes: usize,
) -> Result<(), ArtifactError> {
    validate_artifact(&artifact, max_bytes)?;
    passenger.autorizacion_file = Some(BASE64.encode(&artifact.bytes));
    passenger.autorizacion_file_name = Some(artifact.file_name);
    Ok(())
}
