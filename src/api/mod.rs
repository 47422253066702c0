pub mod payload;

pub use payload::{
    parse_new_admin, parse_new_property, parse_new_proposal, parse_property_id, parse_property_patch,
    parse_proposal_reply, AdminInput, Credentials, FieldViolation, Violations,
};
