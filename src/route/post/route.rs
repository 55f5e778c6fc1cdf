use axum::{
	body::Body,
	extract::State,
	http::Response,
};

use crate::{
	error::Error as AppError,
	extract::{Form, Path, Query, Session},
	flash::{FlashRedirect, Message},
	view::{self, Layout},
	Database,
};

use super::{model, view as page, Error};

/// Fetches a post by id, or fails with [`Error::UnknownPost`].
async fn find_post(database: &Database, post_id: i64) -> Result<model::Post, AppError> {
	let post = sqlx::query_as::<_, model::Post>(
		r"
			SELECT * FROM posts
			WHERE id = $1
		",
	)
	.bind(post_id)
	.fetch_optional(database)
	.await?;

	Ok(post.ok_or(Error::UnknownPost(post_id))?)
}

/// Fetches a post that the session user is allowed to change.
async fn find_own_post(
	database: &Database,
	session: &Session,
	post_id: i64,
) -> Result<model::Post, AppError> {
	let post = find_post(database, post_id).await?;

	if !post.is_authored_by(&session.user.username) {
		return Err(Error::NotAuthor {
			post: post.id,
			username: session.user.username.clone(),
		}
		.into());
	}

	Ok(post)
}

/// Renders a paginated list of all posts, newest first.
pub async fn get_posts(
	State(database): State<Database>,
	layout: Layout,
	Query(paginate): Query<model::Paginate>,
) -> Result<Response<Body>, AppError> {
	let posts = sqlx::query_as::<_, model::Post>(
		r"
			SELECT * FROM posts
			ORDER BY id DESC
			LIMIT $1 OFFSET $2
		",
	)
	.bind(paginate.fetch_limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	view::render(&page::PostList::new(
		layout,
		"All posts",
		"/",
		&paginate,
		posts,
	))
}

/// Renders a paginated list of the session user's posts, newest first.
pub async fn get_user_posts(
	State(database): State<Database>,
	session: Session,
	layout: Layout,
	Query(paginate): Query<model::Paginate>,
) -> Result<Response<Body>, AppError> {
	let posts = sqlx::query_as::<_, model::Post>(
		r"
			SELECT * FROM posts
			WHERE author = $1
			ORDER BY id DESC
			LIMIT $2 OFFSET $3
		",
	)
	.bind(&session.user.username)
	.bind(paginate.fetch_limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	view::render(&page::PostList::new(
		layout,
		"My posts",
		"/my-posts",
		&paginate,
		posts,
	))
}

/// Renders a single post by its id.
pub async fn get_post(
	State(database): State<Database>,
	layout: Layout,
	Path(post_id): Path<i64>,
) -> Result<Response<Body>, AppError> {
	let post = find_post(&database, post_id).await?;
	let is_author = layout
		.username
		.as_deref()
		.is_some_and(|username| post.is_authored_by(username));

	view::render(&page::PostDetail {
		layout,
		post,
		is_author,
	})
}

/// Renders the form for a new post.
pub async fn create_post_form(
	_session: Session,
	layout: Layout,
) -> Result<Response<Body>, AppError> {
	view::render(&page::CreatePost { layout })
}

/// Creates a new post authored by the session user.
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Form(input): Form<model::CreatePostInput>,
) -> Result<FlashRedirect, AppError> {
	let post_id = sqlx::query(
		r"
			INSERT INTO posts (title, author, content, created_at)
			VALUES ($1, $2, $3, $4)
		",
	)
	.bind(&input.title)
	.bind(&session.user.username)
	.bind(&input.content)
	.bind(model::timestamp())
	.execute(&database)
	.await?
	.last_insert_rowid();

	tracing::info!(post = post_id, author = %session.user.username, "created post");

	Ok(FlashRedirect::to("/", Message::PostCreated))
}

/// Renders the edit form of one of your posts, prefilled.
pub async fn update_post_form(
	State(database): State<Database>,
	session: Session,
	layout: Layout,
	Path(post_id): Path<i64>,
) -> Result<Response<Body>, AppError> {
	let post = find_own_post(&database, &session, post_id).await?;

	view::render(&page::EditPost { layout, post })
}

/// Updates the title and content of one of your posts, never its author.
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i64>,
	Form(input): Form<model::UpdatePostInput>,
) -> Result<FlashRedirect, AppError> {
	let post = find_own_post(&database, &session, post_id).await?;

	sqlx::query(
		r"
			UPDATE posts
			SET title = COALESCE($1, title), content = COALESCE($2, content)
			WHERE id = $3
		",
	)
	.bind(input.title)
	.bind(input.content)
	.bind(post.id)
	.execute(&database)
	.await?;

	tracing::info!(post = post.id, "updated post");

	Ok(FlashRedirect::to(
		format!("/post/{}", post.id),
		Message::PostUpdated,
	))
}

/// Deletes one of your posts.
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i64>,
) -> Result<FlashRedirect, AppError> {
	let post = find_own_post(&database, &session, post_id).await?;

	let result = sqlx::query(
		r"
			DELETE FROM posts
			WHERE id = $1
		",
	)
	.bind(post.id)
	.execute(&database)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownPost(post_id).into());
	}

	tracing::info!(post = post.id, "deleted post");

	Ok(FlashRedirect::to("/", Message::PostDeleted))
}
