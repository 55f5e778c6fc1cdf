#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod flash;
mod route;
mod session;
mod trace;
mod view;

use std::{str::FromStr, sync::Arc};

use argon2::Argon2;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceBuilder;
use tower_http::{
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use config::Config;
pub use error::Error;

pub type Database = sqlx::SqlitePool;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool or a hash configuration (if it's expensive to create).
///
/// For dependencies only used by a single handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub config: Arc<Config>,
}

/// Opens the SQLite database, creating the file if it does not exist yet.
async fn connect(database_url: &str) -> Result<Database, sqlx::Error> {
	let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

	SqlitePoolOptions::new().connect_with(options).await
}

/// Builds the router with every route and the HTTP middleware stack.
pub fn app(state: State) -> Router {
	Router::new()
		.merge(route::routes())
		.layer(axum::middleware::from_fn_with_state(
			state.clone(),
			error::render_error_pages,
		))
		.with_state(state)
		.layer(
		ServiceBuilder::new()
			.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
			.layer(TraceLayer::new_for_http())
			.layer(PropagateRequestIdLayer::x_request_id()),
	)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database = connect(&config.database_url).await?;

	sqlx::migrate!().run(&database).await?;

	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	let state = State {
		database,
		hasher: Argon2::default(),
		config: Arc::new(config),
	};

	axum::serve(listener, app(state)).await?;

	Ok(())
}
