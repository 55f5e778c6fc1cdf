pub use crate::route::model::Paginate;

use macros::model;
use serde::Deserialize;

/// Format of [`Post::created_at`], e.g. `2024-05-01 13:37`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single post, created by a user.
#[model]
#[derive(Debug, Deserialize, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The title of the post.
	pub title: String,
	/// Username of the creator. Set from the session and never changed.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The content of the post in plain text.
	pub content: String,
	/// The creation time of the post, formatted with [`TIMESTAMP_FORMAT`].
	#[serde(skip_deserializing)]
	pub created_at: String,
}

impl Post {
	pub fn is_authored_by(&self, username: &str) -> bool {
		self.author == username
	}
}

/// Returns the current local time as stored in [`Post::created_at`].
pub fn timestamp() -> String {
	chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_timestamp_format() {
		let now = timestamp();

		assert!(chrono::NaiveDateTime::parse_from_str(&now, TIMESTAMP_FORMAT).is_ok());
		assert_eq!(now.len(), "2024-05-01 13:37".len());
	}

	#[test]
	fn test_authorship_is_exact() {
		let post = Post {
			id: 1,
			title: "Hello".into(),
			author: "alice".into(),
			content: String::new(),
			created_at: timestamp(),
		};

		assert!(post.is_authored_by("alice"));
		assert!(!post.is_authored_by("Alice"));
		assert!(!post.is_authored_by("alice "));
	}
}
