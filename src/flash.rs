//! One-shot messages carried across a redirect in a cookie.
//!
//! The cookie holds a [`Message`] code rather than free text, so only messages
//! the server knows about can ever be displayed.

use std::fmt;

use axum::{
	body::Body,
	http::{header, Response},
	response::{AppendHeaders, IntoResponse, Redirect},
};

pub const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
	Registered,
	LoggedIn,
	LoggedOut,
	PostCreated,
	PostUpdated,
	PostDeleted,
	LoginRequired,
	SessionExpired,
	InvalidCredentials,
	UsernameTaken,
	NotAuthor,
}

impl Message {
	const ALL: [Self; 11] = [
		Self::Registered,
		Self::LoggedIn,
		Self::LoggedOut,
		Self::PostCreated,
		Self::PostUpdated,
		Self::PostDeleted,
		Self::LoginRequired,
		Self::SessionExpired,
		Self::InvalidCredentials,
		Self::UsernameTaken,
		Self::NotAuthor,
	];

	/// The value stored in the cookie.
	pub fn code(self) -> &'static str {
		match self {
			Self::Registered => "registered",
			Self::LoggedIn => "logged_in",
			Self::LoggedOut => "logged_out",
			Self::PostCreated => "post_created",
			Self::PostUpdated => "post_updated",
			Self::PostDeleted => "post_deleted",
			Self::LoginRequired => "login_required",
			Self::SessionExpired => "session_expired",
			Self::InvalidCredentials => "invalid_credentials",
			Self::UsernameTaken => "username_taken",
			Self::NotAuthor => "not_author",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|message| message.code() == code)
	}

	pub fn is_error(self) -> bool {
		matches!(
			self,
			Self::LoginRequired
				| Self::SessionExpired
				| Self::InvalidCredentials
				| Self::UsernameTaken
				| Self::NotAuthor
		)
	}
}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Registered => "Registration successful. Please log in.",
			Self::LoggedIn => "You are now logged in.",
			Self::LoggedOut => "You have been logged out.",
			Self::PostCreated => "Post created.",
			Self::PostUpdated => "Post updated.",
			Self::PostDeleted => "Post deleted.",
			Self::LoginRequired => "Please log in to continue.",
			Self::SessionExpired => "Your session has expired. Please log in again.",
			Self::InvalidCredentials => "Invalid username or password.",
			Self::UsernameTaken => "That username is already taken.",
			Self::NotAuthor => "You can only change your own posts.",
		})
	}
}

pub fn create_cookie(message: Message) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, message.code()))
		.http_only(true)
		.same_site(cookie::SameSite::Lax)
		.path("/")
		.into()
}

/// Creates an empty flash cookie, sent once the message has been shown
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

/// A `303 See Other` redirect that leaves a flash message for the next page.
///
/// ```ignore
/// async fn route() -> FlashRedirect {
///   FlashRedirect::to("/", Message::PostDeleted)
/// }
/// ```
#[derive(Debug)]
pub struct FlashRedirect {
	to: String,
	cookies: Vec<cookie::Cookie<'static>>,
}

impl FlashRedirect {
	pub fn to(to: impl Into<String>, message: Message) -> Self {
		Self {
			to: to.into(),
			cookies: vec![create_cookie(message)],
		}
	}

	/// Sets an additional cookie on the redirect response.
	#[must_use]
	pub fn with_cookie(mut self, cookie: cookie::Cookie<'static>) -> Self {
		self.cookies.push(cookie);
		self
	}
}

impl IntoResponse for FlashRedirect {
	fn into_response(self) -> Response<Body> {
		let cookies = self
			.cookies
			.iter()
			.map(|cookie| (header::SET_COOKIE, cookie.to_string()))
			.collect::<Vec<_>>();

		(AppendHeaders(cookies), Redirect::to(&self.to)).into_response()
	}
}
