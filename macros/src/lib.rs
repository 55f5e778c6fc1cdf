mod model;

use proc_macro::TokenStream;

/// Derives the input structs of a model: `CreateXInput` holds every field a client
/// may submit, and `UpdateXInput` holds the same fields wrapped in [`Option`].
///
/// Fields with `#[serde(skip_deserializing)]` or `#[serde(skip)]` are server-owned
/// and left out of both. All other fields are copied verbatim (including attributes).
///
/// Pass `create` or `update` to generate only one of them:
///
/// ```ignore
/// #[model(create)]
/// #[derive(Deserialize)]
/// pub struct User {
///     #[serde(skip_deserializing)]
///     pub id: i64,
///     pub username: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
