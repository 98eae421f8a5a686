pub mod author_handlers;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod responder;
pub mod routes;

pub use error::*;
pub use extract::*;
pub use routes::*;
