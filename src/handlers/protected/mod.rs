// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here can rely on a `Principal` in the request extensions.

pub mod admins;
pub mod properties;
pub mod proposals;
