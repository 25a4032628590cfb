pub mod html;
pub mod response;

pub use response::{DetailEnvelope, GENERIC_ERROR_MESSAGE, GenericEnvelope};
