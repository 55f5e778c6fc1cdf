use axum::{http::StatusCode, routing::get, Router};

use crate::{
	error::{ErrorShape, Outcome},
	flash, AppState,
};

pub mod model;
pub mod route;
pub mod view;

/// An error that can occur during authentication.
///
/// Note that the messages may be presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password hashing error: {0}")]
	Hash(#[from] argon2::password_hash::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("username already taken")]
	UsernameTaken,
}

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/login", get(login_form).post(login))
		.route("/logout", get(logout))
		.route("/register", get(register_form).post(register))
}

impl ErrorShape for Error {
	fn outcome(&self) -> Outcome {
		match self {
			Self::InvalidUsernameOrPassword => {
				Outcome::Redirect("/login".into(), flash::Message::InvalidCredentials)
			}
			Self::NoSessionCookie => Outcome::Redirect("/login".into(), flash::Message::LoginRequired),
			Self::InvalidSessionCookie => {
				Outcome::Redirect("/login".into(), flash::Message::SessionExpired)
			}
			Self::UsernameTaken => Outcome::Redirect("/register".into(), flash::Message::UsernameTaken),
			Self::Hash(..) => Outcome::Page(StatusCode::INTERNAL_SERVER_ERROR),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = register(&app, "john", "hunter2hunter").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/login");

		let html = app.get("/login").await.text();

		assert!(html.contains("Registration successful. Please log in."));

		let response = login(&app, "john", "hunter2hunter").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/");

		assert!(response
			.headers()
			.get_all("set-cookie")
			.iter()
			.any(|cookie| cookie.to_str().unwrap().starts_with("session=")));

		let html = app.get("/").await.text();

		assert!(html.contains("You are now logged in."));
		assert!(html.contains("john"));
		assert!(html.contains("/logout"));
		assert_eq!(app.get("/my-posts").await.status_code(), StatusCode::OK);
	}

	#[sqlx::test]
	async fn test_password_is_hashed(pool: Database) {
		let app = app(pool.clone());

		register(&app, "john", "hunter2hunter").await;

		let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'john'")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_ne!(stored, "hunter2hunter");
		assert!(stored.starts_with("$argon2id$"));
	}

	#[sqlx::test]
	async fn test_duplicate_username_is_rejected(pool: Database) {
		let app = app(pool.clone());

		register(&app, "john", "first-password").await;
		let response = register(&app, "john", "second-password").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/register");

		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'john'")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(count, 1);
		assert!(app
			.get("/register")
			.await
			.text()
			.contains("That username is already taken."));

		// the original password still works
		let response = login(&app, "john", "first-password").await;

		assert_eq!(response.header("location"), "/");
	}

	#[sqlx::test]
	async fn test_wrong_password_does_not_log_in(pool: Database) {
		let app = app(pool.clone());

		register(&app, "john", "hunter2hunter").await;
		let response = login(&app, "john", "not-the-password").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/login");
		assert!(!response
			.headers()
			.get_all("set-cookie")
			.iter()
			.any(|cookie| cookie.to_str().unwrap().starts_with("session=")));

		assert_eq!(session_count(&pool).await, 0);
		assert!(app
			.get("/login")
			.await
			.text()
			.contains("Invalid username or password."));
		assert_eq!(app.get("/create").await.header("location"), "/login");
	}

	#[sqlx::test]
	async fn test_unknown_user_does_not_log_in(pool: Database) {
		let app = app(pool);

		let response = login(&app, "nobody", "hunter2hunter").await;

		assert_eq!(response.header("location"), "/login");
		assert_eq!(app.get("/my-posts").await.status_code(), StatusCode::SEE_OTHER);
	}

	#[sqlx::test]
	async fn test_logout_ends_session(pool: Database) {
		let app = sign_in(&pool, "john").await;

		assert_eq!(app.get("/create").await.status_code(), StatusCode::OK);

		let response = app.get("/logout").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/");

		assert_eq!(session_count(&pool).await, 0);
		assert_eq!(app.get("/create").await.header("location"), "/login");
	}

	#[sqlx::test]
	async fn test_forged_session_cookie_is_rejected(pool: Database) {
		let app = app(pool);

		let response = app
			.get("/create")
			.add_cookie(cookie::Cookie::new("session", uuid::Uuid::new_v4().to_string()))
			.await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/login");
	}

	#[sqlx::test]
	async fn test_login_replaces_previous_session(pool: Database) {
		let app = sign_in(&pool, "john").await;

		for _ in 0..3 {
			let response = login(&app, "john", "hunter2hunter").await;

			assert_eq!(response.header("location"), "/");
		}

		assert_eq!(session_count(&pool).await, 1);
		assert_eq!(app.get("/create").await.status_code(), StatusCode::OK);
	}

	#[sqlx::test]
	async fn test_expired_session_is_rejected(pool: Database) {
		let app = sign_in(&pool, "john").await;

		sqlx::query("UPDATE sessions SET created_at = datetime('now', '-31 days')")
			.execute(&pool)
			.await
			.unwrap();

		let response = app.get("/create").await;

		assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
		assert_eq!(response.header("location"), "/login");

		let html = app.get("/login").await.text();

		assert!(html.contains("Your session has expired. Please log in again."));
		assert!(!html.contains("/logout"));
	}

	#[sqlx::test]
	async fn test_login_removes_expired_sessions(pool: Database) {
		sign_in(&pool, "john").await;

		sqlx::query("UPDATE sessions SET created_at = datetime('now', '-31 days')")
			.execute(&pool)
			.await
			.unwrap();

		sign_in(&pool, "jane").await;

		let owners: Vec<String> = sqlx::query_scalar(
			"SELECT users.username FROM sessions JOIN users ON users.id = sessions.user_id",
		)
		.fetch_all(&pool)
		.await
		.unwrap();

		assert_eq!(owners, ["jane"]);
	}
}
