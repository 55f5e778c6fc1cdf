//! Shared pieces of every rendered page.

use std::{convert::Infallible, sync::Arc};

use askama::Template;
use axum::{
	body::Body,
	extract::{FromRef, FromRequestParts},
	http::{header, request, HeaderMap, Response, StatusCode},
	response::{Html, IntoResponse},
};

use crate::{
	config::Config,
	error::Error,
	extract::{self, Session},
	flash, Database,
};

/// What the base layout needs: who is logged in, and any pending flash message.
#[derive(Debug, Default)]
pub struct Layout {
	pub username: Option<String>,
	pub flash: Option<flash::Message>,
	/// A flash cookie was sent, recognised or not, and must be cleared.
	pub clear_flash: bool,
}

impl Layout {
	pub fn new(session: Option<&Session>, headers: &HeaderMap) -> Self {
		let flash = extract::cookie_value(headers, flash::COOKIE_NAME)
			.filter(|code| !code.is_empty());

		Self {
			username: session.map(|session| session.user.username.clone()),
			flash: flash
				.as_deref()
				.and_then(flash::Message::from_code),
			clear_flash: flash.is_some(),
		}
	}

	/// Builds the layout without an extracted session, e.g. for error pages.
	pub async fn from_headers(database: &Database, config: &Config, headers: &HeaderMap) -> Self {
		let session = optional(Session::from_headers(database, config, headers).await);

		Self::new(session.as_ref(), headers)
	}
}

/// Being logged out is not an error for the layout, but a failed lookup is logged.
fn optional(session: Result<Session, Error>) -> Option<Session> {
	match session {
		Ok(session) => Some(session),
		Err(Error::Auth(..)) => None,
		Err(error) => {
			tracing::error!(%error, "failed to load session for layout");
			None
		}
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Layout
where
	Database: FromRef<S>,
	Arc<Config>: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Infallible;

	/// Reuses the session if the handler already extracted one.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session = optional(Session::from_request_parts(parts, state).await);

		Ok(Self::new(session.as_ref(), &parts.headers))
	}
}

/// A template rendered inside the base layout.
pub trait Page: Template {
	fn layout(&self) -> &Layout;
}

/// Implements [`Page`] for templates with a `layout` field.
macro_rules! page {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::view::Page for $ty {
				fn layout(&self) -> &$crate::view::Layout {
					&self.layout
				}
			}
		)+
	};
}

pub(crate) use page;

/// Renders a page, clearing the flash cookie once it has been read.
pub fn render<T: Page>(page: &T) -> Result<Response<Body>, Error> {
	let html = Html(page.render()?);

	Ok(if page.layout().clear_flash {
		([(header::SET_COOKIE, flash::clear_cookie().to_string())], html).into_response()
	} else {
		html.into_response()
	})
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
	pub layout: Layout,
	pub status: StatusCode,
	pub message: String,
}

page!(ErrorPage);
