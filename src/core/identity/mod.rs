pub mod gallery;
pub mod matcher;
pub mod types;

pub use gallery::Gallery;
pub use matcher::{face_distance, IdentityMatcher};
pub use types::{BoundingBox, FaceDetection, IdentityMatch, KnownIdentity, UNKNOWN_IDENTITY};
