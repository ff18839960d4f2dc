mod health;
mod qr;

pub use health::HealthResponse;
pub use qr::{GenerateForm, HandoffPage, IndexPage};
