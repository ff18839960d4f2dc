mod health;
mod qr;

pub use health::health_handler;
pub use qr::{generate_handler, index_handler, scan_handler};
