use argon2::{
	password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	body::Body,
	extract::State,
	http::Response,
};
use uuid::Uuid;

use crate::{
	error::Error as AppError,
	extract::{Form, Session},
	flash::{FlashRedirect, Message},
	session,
	view::{self, Layout},
	AppState, Database,
};

use super::{model, view as page, Error};

/// Hashes a password with Argon2 into a PHC string, salted with a fresh random id.
pub fn hash_password(hasher: &Argon2, password: &str) -> Result<String, password_hash::Error> {
	let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a stored PHC string in constant time.
pub fn verify_password(
	hasher: &Argon2,
	password: &str,
	hash: &str,
) -> Result<bool, password_hash::Error> {
	let hash = PasswordHash::new(hash)?;

	match hasher.verify_password(password.as_bytes(), &hash) {
		Ok(()) => Ok(true),
		Err(password_hash::Error::Password) => Ok(false),
		Err(e) => Err(e),
	}
}

/// Renders the log in form.
pub async fn login_form(layout: Layout) -> Result<Response<Body>, AppError> {
	view::render(&page::Login { layout })
}

/// Logs in to an account, replacing any current session with a new one.
pub async fn login(
	State(state): State<AppState>,
	previous: Option<Session>,
	Form(input): Form<model::LoginInput>,
) -> Result<FlashRedirect, AppError> {
	let user = sqlx::query_as::<_, model::User>("SELECT * FROM users WHERE username = $1")
		.bind(&input.username)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidUsernameOrPassword.into());
	};

	if !verify_password(&state.hasher, &input.password, &user.password).map_err(Error::Hash)? {
		tracing::info!(user = %user.username, "rejected login");
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	if let Some(previous) = previous {
		sqlx::query("DELETE FROM sessions WHERE id = $1")
			.bind(previous.id.to_string())
			.execute(&state.database)
			.await?;
	}

	let purged = sqlx::query("DELETE FROM sessions WHERE created_at <= datetime('now', $1)")
		.bind(session::max_age_modifier(state.config.session_max_age))
		.execute(&state.database)
		.await?
		.rows_affected();

	if purged > 0 {
		tracing::debug!(purged, "removed expired sessions");
	}

	let session_id = Uuid::new_v4();

	sqlx::query("INSERT INTO sessions (id, user_id) VALUES ($1, $2)")
		.bind(session_id.to_string())
		.bind(user.id)
		.execute(&state.database)
		.await?;

	tracing::info!(user = %user.username, "logged in");

	Ok(FlashRedirect::to("/", Message::LoggedIn)
		.with_cookie(session::create_cookie(session_id, state.config.secure_cookies)))
}

/// Ends the current session, if any, and clears the session cookie.
pub async fn logout(
	State(database): State<Database>,
	session: Option<Session>,
) -> Result<FlashRedirect, AppError> {
	if let Some(session) = session {
		sqlx::query("DELETE FROM sessions WHERE id = $1")
			.bind(session.id.to_string())
			.execute(&database)
			.await?;

		tracing::info!(user = %session.user.username, "logged out");
	}

	Ok(FlashRedirect::to("/", Message::LoggedOut).with_cookie(session::clear_cookie()))
}

/// Renders the registration form.
pub async fn register_form(layout: Layout) -> Result<Response<Body>, AppError> {
	view::render(&page::Register { layout })
}

/// Registers a new account, which the user then logs in to separately.
pub async fn register(
	State(state): State<AppState>,
	Form(input): Form<model::CreateUserInput>,
) -> Result<FlashRedirect, AppError> {
	let hashed = hash_password(&state.hasher, &input.password).map_err(Error::Hash)?;

	sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
		.bind(&input.username)
		.bind(hashed)
		.execute(&state.database)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.is_unique_violation() => Error::UsernameTaken.into(),
			e => AppError::from(e),
		})?;

	tracing::info!(user = %input.username, "registered");

	Ok(FlashRedirect::to("/login", Message::Registered))
}
