//! Error types for retrieval, delivery and configuration.
//!
//! Retrieval failures are classified so the orchestrator can log them with a
//! stable code and keep going:
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `Network` | fetcher | transport failure or 10s timeout |
//! | `Remote` | fetcher | non-2xx HTTP status |
//! | `Encoding` | fetcher | content encoding other than base64 |
//! | `Decode` | fetcher, decoder | bad base64 or malformed payload JSON |
//! | `Parse` | freshness | unparsable timestamp |
//! | `Exhausted` | orchestrator | retry budget spent, nothing usable |
//! | `Delivery` | dispatcher | clipboard or injector failed |

mod code_error;
mod config;

pub use code_error::{CodeError, CodeResult, ProviderFailure};
pub use config::ConfigError;
