//! HTTP surface of the qrtrack service.
//!
//! Serves the listing page, the generation form target and the scan
//! endpoint on top of an [`Issuer`](qrtrack_issuer::Issuer) and a
//! [`Redirector`](qrtrack_redirector::Redirector).

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod presenter;
pub mod state;

pub use app::App;
pub use presenter::ScanPresenter;
pub use state::AppState;
