pub mod enquiry;
pub mod user;
