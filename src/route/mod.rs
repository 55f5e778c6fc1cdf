use axum::Router;

use crate::AppState;

pub mod auth;
pub mod model;
pub mod post;

pub fn routes() -> Router<AppState> {
	Router::new().merge(post::routes()).merge(auth::routes())
}
