pub mod error;
pub mod geometry;
pub mod parcel;
pub mod proxy;
pub mod search;
pub mod sequencer;
pub mod types;

pub use error::ResolveError;
pub use geometry::Ring;
pub use parcel::{DataQuality, ParcelResolution, ParcelResolver, ResolverSettings};
pub use proxy::ProxyClient;
pub use sequencer::{try_sequentially, Attempt, AttemptFailure, FailureKind, SequenceOutcome};
pub use types::SearchCandidate;
