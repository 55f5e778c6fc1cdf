use std::time::Duration;

use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// SQLite `datetime('now', ...)` modifier for the oldest `created_at` still accepted.
///
/// ```sql
/// SELECT * FROM sessions WHERE created_at > datetime('now', $1)
/// ```
pub fn max_age_modifier(max_age: Duration) -> String {
	format!("-{} seconds", max_age.as_secs())
}

/// Creates a session cookie with no expiry
pub fn create_cookie(session_id: Uuid, secure: bool) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, session_id.to_string()))
		.secure(secure)
		.http_only(true)
		.same_site(cookie::SameSite::Lax)
		.path("/")
		.into()
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_session_cookie() {
		let id = Uuid::new_v4();
		let cookie = create_cookie(id, false);

		assert_eq!(cookie.name(), COOKIE_NAME);
		assert_eq!(cookie.value(), id.to_string());
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.secure(), Some(false));
		assert_eq!(cookie.path(), Some("/"));
	}

	#[test]
	fn test_max_age_modifier() {
		assert_eq!(max_age_modifier(Duration::from_secs(3600)), "-3600 seconds");
		assert_eq!(max_age_modifier(Duration::ZERO), "-0 seconds");
	}

	#[test]
	fn test_clear_cookie() {
		let cookie = clear_cookie();

		assert_eq!(cookie.value(), "");
		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}
}
