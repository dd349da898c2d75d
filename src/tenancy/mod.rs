pub mod error;
pub mod host;
pub mod memory;
pub mod postgres;
pub mod resolver;
pub mod signals;
pub mod store;

pub use error::{Diagnostics, TenancyError};
pub use memory::MemoryTenancyStore;
pub use postgres::PgTenancyStore;
pub use resolver::{Resolution, ResolvedTenant, ResolverSettings, TenantResolver};
pub use signals::{RequestSignals, SlugSource};
pub use store::{DomainRegistry, StoreError, TenantDirectory};
