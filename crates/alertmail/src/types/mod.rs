//! Core SMTP types.

mod address;
mod reply;
mod resource;

pub use address::{Address, MAX_ADDRESS_LENGTH};
pub use reply::ReplyCode;
pub use resource::ResourceContext;
