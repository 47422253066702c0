pub mod admin;
pub mod audit;
pub mod customer;
pub mod landlord;
pub mod property;
pub mod proposal;

pub use admin::{AdminAccount, NewAdmin};
pub use audit::{AuditLogEntry, NewAuditEntry};
pub use customer::{CustomerAccount, NewCustomer};
pub use landlord::{Landlord, NewLandlord};
pub use property::{NewProperty, Property, PropertyPatch, PropertyType, UnknownPropertyType};
pub use proposal::{NewProposal, Proposal};
