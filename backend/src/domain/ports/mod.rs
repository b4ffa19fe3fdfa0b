//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod registration_command;
mod registration_query;
mod registration_store;

pub use registration_command::RegistrationCommand;
pub use registration_query::{RegistrationQuery, RegistrationStatistics};
#[cfg(test)]
pub use registration_store::MockRegistrationStore;
pub use registration_store::{
    InMemoryRegistrationStore, RegistrationStore, RegistrationStoreError,
};
