pub mod builder;
pub mod client;
pub mod error;
pub mod event;
pub mod router;
pub mod transport;

pub use builder::{EventBuilder, Overrides};
pub use client::LoggingClient;
pub use error::ValidationError;
pub use event::{Event, SessionDefaults, Severity};
pub use router::{Destination, DestinationRouter, DispatchError, Outcome};
pub use transport::{HttpTransport, Transport, TransportError};
