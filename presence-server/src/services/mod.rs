mod credential_service;
mod presence_service;

pub use credential_service::*;
pub use presence_service::*;
