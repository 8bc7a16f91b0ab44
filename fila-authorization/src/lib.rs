pub mod artifact;
pub mod capture;
pub mod document;

pub use artifact::{
    attach_artifact, validate_artifact, ArtifactError, RawArtifact, MAX_ARTIFACT_BYTES,
};
pub use capture::{ArtifactSource, CameraStreamGuard, DeviceProbe, UserAgentProbe};
pub use document::ConsentDocument;
