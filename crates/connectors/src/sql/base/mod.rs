pub mod destination;
pub mod error;
pub mod requests;
pub mod source;
