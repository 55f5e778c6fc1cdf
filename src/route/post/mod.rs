use axum::{
	http::StatusCode,
	routing::{get, post},
	Router,
};

use crate::{
	error::{ErrorShape, Outcome},
	flash, AppState,
};

pub mod model;
pub mod route;
pub mod view;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i64),
	#[error("post {post} does not belong to {username}")]
	NotAuthor { post: i64, username: String },
}

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/", get(get_posts))
		.route("/post/:id", get(get_post))
		.route("/create", get(create_post_form).post(create_post))
		.route("/edit/:id", get(update_post_form).post(update_post))
		.route("/delete/:id", post(delete_post))
		.route("/my-posts", get(get_user_posts))
}

impl ErrorShape for Error {
	fn outcome(&self) -> Outcome {
		match self {
			Self::UnknownPost(..) => Outcome::Page(StatusCode::NOT_FOUND),
			Self::NotAuthor { post, .. } => {
				Outcome::Redirect(format!("/post/{post}"), flash::Message::NotAuthor)
			}
		}
	}
}
