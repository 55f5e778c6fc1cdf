use macros::model;
use serde::Deserialize;

/// A single user.
#[model(create)]
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The unique username, also stored as the author of the user's posts.
	pub username: String,
	/// The password: an Argon2 PHC string once stored, plain text when submitted.
	pub password: String,
}

/// Login takes the same fields as registration.
pub type LoginInput = CreateUserInput;
