//! Router assembly.

use axum::routing::{get, post};
use axum::Router;

use crate::registration::RegistrationProvider;

use super::{authorization, credential, state::StubState, token};

/// Builds the stub's router. The caller supplies the state with
/// [`Router::with_state`].
pub fn stub_router<P: RegistrationProvider + 'static>() -> Router<StubState<P>> {
    Router::new()
        .route("/authorize", get(authorization::authorize::<P>))
        .route("/token", post(token::token::<P>))
        .route("/credential", get(credential::credential::<P>))
}
