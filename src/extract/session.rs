use std::sync::Arc;

use axum::{
	extract::{FromRef, FromRequestParts},
	http::{request, HeaderMap},
};
use uuid::Uuid;

use crate::{config::Config, error::Error, route::auth, session, Database};

/// Extracts the session and related user from the request.
///
/// If it does not exist, a [`auth::Error::NoSessionCookie`] is returned.
/// If the session is unknown or older than [`Config::session_max_age`],
/// a [`auth::Error::InvalidSessionCookie`] is returned.
/// Both send the browser to the login page.
///
/// The session is cached in the request extensions, so extracting it twice
/// (directly and through [`crate::view::Layout`]) costs one query.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

impl Session {
	/// Resolves the session cookie in `headers` to a live session.
	pub async fn from_headers(
		database: &Database,
		config: &Config,
		headers: &HeaderMap,
	) -> Result<Self, Error> {
		let session_id = super::cookie_value(headers, session::COOKIE_NAME)
			.filter(|value| !value.is_empty())
			.ok_or(auth::Error::NoSessionCookie)?;

		let session_id =
			Uuid::parse_str(&session_id).map_err(|_| auth::Error::InvalidSessionCookie)?;

		let user = sqlx::query_as::<_, auth::model::User>(
			r"
				SELECT users.* FROM users
				JOIN sessions ON sessions.user_id = users.id
				WHERE sessions.id = $1 AND sessions.created_at > datetime('now', $2)
			",
		)
		.bind(session_id.to_string())
		.bind(session::max_age_modifier(config.session_max_age))
		.fetch_optional(database)
		.await?;

		let user = user.ok_or(auth::Error::InvalidSessionCookie)?;

		Ok(Self {
			id: session_id,
			user,
		})
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	Arc<Config>: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		if let Some(session) = parts.extensions.get::<Self>() {
			return Ok(session.clone());
		}

		let database = Database::from_ref(state);
		let config = Arc::<Config>::from_ref(state);
		let session = Self::from_headers(&database, &config, &parts.headers).await?;

		parts.extensions.insert(session.clone());

		Ok(session)
	}
}
