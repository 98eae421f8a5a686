pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::*;
pub use postgres::*;
pub use traits::*;

/// Connection strings starting with this scheme select the in-process store
pub const MEMORY_SCHEME: &str = "memory://";

pub fn is_memory_url(url: &str) -> bool {
    url.starts_with(MEMORY_SCHEME)
}
