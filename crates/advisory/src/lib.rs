//! External advisory gateway for the Sinais API.
//!
//! Three capabilities sit behind this crate:
//!
//! - Conversational advice from an OpenAI-compatible completion provider
//! - Brazilian postal code (CEP) lookup through ViaCEP
//! - Canned motivational and crisis messages plus a generic health resource list
//!
//! Provider failures never surface as errors. Each operation answers with a
//! fixed user-facing message and logs the cause.
//!
//! # Usage
//!
//! ```rust,no_run
//! use advisory::AdvisoryGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = AdvisoryGateway::from_env()?;
//!     println!("{}", gateway.advise("Como evitar uma recaída?").await);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod error;
mod gateway;
pub mod messages;

pub use config::{AdvisoryConfig, AdvisoryConfigBuilder, PLACEHOLDER_API_KEY};
pub use error::AdvisoryError;
pub use gateway::{
    AdvisoryGateway, PostalAddress, PostalLookup, CEP_INTERNAL_ERROR, CEP_NOT_FOUND,
    CEP_PROVIDER_ERROR, INTERNAL_FAILURE, KEY_NOT_CONFIGURED, NO_RESPONSE, PROVIDER_UNREACHABLE,
};
pub use messages::{
    crisis_support_message, health_resources_for_city, motivational_message,
    CityHealthResources, HealthResource,
};
