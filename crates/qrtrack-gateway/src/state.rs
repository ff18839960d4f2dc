use std::sync::Arc;

use qrtrack_issuer::Issuer;
use qrtrack_redirector::Redirector;

use crate::presenter::ScanPresenter;

#[derive(Clone)]
pub struct AppState {
    pub(crate) issuer: Arc<dyn Issuer>,
    pub(crate) redirector: Arc<dyn Redirector>,
    pub(crate) presenter: ScanPresenter,
}

impl AppState {
    pub fn new(
        issuer: Arc<dyn Issuer>,
        redirector: Arc<dyn Redirector>,
        presenter: ScanPresenter,
    ) -> Self {
        Self {
            issuer,
            redirector,
            presenter,
        }
    }
}
