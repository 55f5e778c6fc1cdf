use axum::{
	body::Body,
	extract::{rejection, Request, State},
	http::{Response, StatusCode},
	middleware::Next,
	response::{Html, IntoResponse},
};

use crate::{
	flash::{self, FlashRedirect},
	route::{auth, post},
	view, AppState,
};

/// How a domain error is presented to the browser.
#[derive(Debug)]
pub enum Outcome {
	/// Render the error page with this status.
	Page(StatusCode),
	/// Redirect elsewhere, leaving a flash message behind.
	Redirect(String, flash::Message),
}

/// Implemented by the error type of each route module.
pub trait ErrorShape: std::error::Error {
	fn outcome(&self) -> Outcome;
}

/// Error type for the application.
///
/// The Display trait is not sent to the client for server errors,
/// so it can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("auth error: {0}")]
	Auth(#[from] auth::Error),
	#[error("post error: {0}")]
	Post(#[from] post::Error),
	#[error("form error: {0}")]
	Form(#[from] rejection::FormRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("template error: {0}")]
	Template(#[from] askama::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl Error {
	fn outcome(&self) -> Outcome {
		match self {
			Self::Auth(error) => error.outcome(),
			Self::Post(error) => error.outcome(),
			// every path parameter is a post id, so a malformed one names no post
			Self::Path(..) => Outcome::Page(StatusCode::NOT_FOUND),
			Self::Form(..) | Self::Query(..) => Outcome::Page(StatusCode::BAD_REQUEST),
			Self::Template(..) | Self::Database(..) => {
				Outcome::Page(StatusCode::INTERNAL_SERVER_ERROR)
			}
		}
	}

	/// The message shown on the error page. Server errors never expose their details.
	fn public_message(&self, status: StatusCode) -> String {
		if status.is_server_error() {
			return "something went wrong".into();
		}

		match self {
			Self::Auth(error) => error.to_string(),
			Self::Post(error) => error.to_string(),
			Self::Form(error) => error.body_text(),
			Self::Path(..) => "page not found".into(),
			Self::Query(error) => error.body_text(),
			Self::Template(error) => error.to_string(),
			Self::Database(error) => error.to_string(),
		}
	}
}

/// Attached to error page responses, so [`render_error_pages`] can render them
/// again with the layout of the request.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
	pub status: StatusCode,
	pub message: String,
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = match self.outcome() {
			Outcome::Redirect(to, message) => return FlashRedirect::to(to, message).into_response(),
			Outcome::Page(status) => status,
		};

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		let details = ErrorDetails {
			status,
			message: self.public_message(status),
		};

		let page = view::ErrorPage {
			layout: view::Layout::default(),
			status,
			message: details.message.clone(),
		};

		let mut response = match askama::Template::render(&page) {
			Ok(html) => (status, Html(html)).into_response(),
			Err(error) => {
				tracing::error!(%error, "failed to render error page");
				(status, page.message).into_response()
			}
		};

		response.extensions_mut().insert(details);
		response
	}
}

/// Middleware that renders error pages with the navigation and flash message
/// of the request, which [`Error::into_response`] has no access to.
pub async fn render_error_pages(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Response<Body> {
	let headers = request.headers().clone();
	let response = next.run(request).await;

	let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
		return response;
	};

	let page = view::ErrorPage {
		layout: view::Layout::from_headers(&state.database, &state.config, &headers).await,
		status: details.status,
		message: details.message,
	};

	match view::render(&page) {
		Ok(mut rendered) => {
			*rendered.status_mut() = details.status;
			rendered
		}
		Err(error) => {
			tracing::error!(%error, "failed to render error page");
			response
		}
	}
}

#[cfg(test)]
mod test {
	use axum::http::header;

	use super::*;

	#[test]
	fn test_unknown_post_renders_not_found() {
		let response = Error::from(post::Error::UnknownPost(3)).into_response();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn test_malformed_id_renders_not_found() {
		let error = Error::Path(rejection::PathRejection::MissingPathParams(
			rejection::MissingPathParams::default(),
		));
		let response = error.into_response();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.extensions().get::<ErrorDetails>().unwrap().message,
			"page not found"
		);
	}

	#[test]
	fn test_login_required_redirects_with_flash() {
		let response = Error::from(auth::Error::NoSessionCookie).into_response();

		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(response.headers()[header::LOCATION], "/login");
		assert!(response.headers()[header::SET_COOKIE]
			.to_str()
			.unwrap()
			.starts_with("flash=login_required"));
	}

	#[test]
	fn test_server_errors_hide_details() {
		let error = Error::from(sqlx::Error::RowNotFound);

		assert_eq!(
			error.public_message(StatusCode::INTERNAL_SERVER_ERROR),
			"something went wrong"
		);
		assert_eq!(
			error.into_response().status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}
}
