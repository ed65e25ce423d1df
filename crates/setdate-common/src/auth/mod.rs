//! Portal credential utilities

mod portal_token;

pub use portal_token::{PortalClaims, PortalTokenService};
