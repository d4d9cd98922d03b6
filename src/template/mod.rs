//! Email template system.
//!
//! This module provides:
//! - Template definition with `{{variable}}` placeholders for subject and bodies
//! - Single-pass variable substitution for rendering templates
//! - A read-only store abstraction with in-memory and PostgreSQL backends
//!
//! # Example
//!
//! ```ignore
//! let store = MemoryTemplateStore::new();
//! store.upsert(EmailTemplate::new(
//!     "booking_confirmation",
//!     "Booking {{bookingId}} confirmed",
//!     "<p>Hi {{guestName}}</p>",
//! ));
//!
//! let template = store.find_active("booking_confirmation").await?.unwrap();
//! let rendered = template.render(&variables);
//! ```

mod factory;
mod postgres_store;
mod render;
mod store;
mod types;

pub use factory::create_template_store;
pub use postgres_store::PostgresTemplateStore;
pub use render::{placeholders, render};
pub use store::{MemoryTemplateStore, StoreError, TemplateStore};
pub use types::{
    deserialize_variables, EmailTemplate, RenderedEmail, TemplateListResponse, Variables,
};
