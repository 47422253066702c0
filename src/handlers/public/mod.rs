// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Listing reads, search, customer proposals and token acquisition.

pub mod properties;
pub mod proposals;
pub mod session;
