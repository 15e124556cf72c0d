pub mod client;
pub mod family;
pub mod transport;

pub use client::{GenerationClient, RetryPolicy};
pub use family::ModelFamily;
pub use transport::{classify_status, HttpTransport, InferenceTransport};
