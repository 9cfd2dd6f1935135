//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ProfilesAppState;
pub use router::{profiles_router, profiles_router_generic};
