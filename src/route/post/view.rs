use askama::Template;

use crate::view::{page, Layout};

use super::model::{Paginate, Post};

/// A page of posts, newest first. Used for both `/` and `/my-posts`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct PostList {
	pub layout: Layout,
	pub heading: &'static str,
	pub posts: Vec<Post>,
	pub previous: Option<String>,
	pub next: Option<String>,
}

impl PostList {
	/// Builds the page from a query made with [`Paginate::fetch_limit`],
	/// dropping the extra row if there is one.
	pub fn new(
		layout: Layout,
		heading: &'static str,
		base: &str,
		paginate: &Paginate,
		mut posts: Vec<Post>,
	) -> Self {
		let page = paginate.page();
		let size = paginate.limit();
		let has_next = posts.len() > usize::try_from(size).unwrap_or(usize::MAX);

		posts.truncate(usize::try_from(size).unwrap_or(usize::MAX));

		Self {
			layout,
			heading,
			posts,
			previous: (page > 1).then(|| format!("{base}?page={}&size={size}", page - 1)),
			next: has_next.then(|| format!("{base}?page={}&size={size}", page + 1)),
		}
	}
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostDetail {
	pub layout: Layout,
	pub post: Post,
	pub is_author: bool,
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreatePost {
	pub layout: Layout,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPost {
	pub layout: Layout,
	pub post: Post,
}

page!(PostList, PostDetail, CreatePost, EditPost);

#[cfg(test)]
mod test {
	use super::*;

	fn posts(count: i64) -> Vec<Post> {
		(1..=count)
			.rev()
			.map(|id| Post {
				id,
				title: format!("post {id}"),
				author: "alice".into(),
				content: String::new(),
				created_at: "2024-05-01 13:37".into(),
			})
			.collect()
	}

	#[test]
	fn test_first_page_with_more() {
		let paginate = Paginate { page: 1, size: 2 };
		let list = PostList::new(Layout::default(), "All posts", "/", &paginate, posts(3));

		assert_eq!(list.posts.len(), 2);
		assert_eq!(list.posts[0].id, 3);
		assert_eq!(list.previous, None);
		assert_eq!(list.next.as_deref(), Some("/?page=2&size=2"));
	}

	#[test]
	fn test_last_page() {
		let paginate = Paginate { page: 2, size: 2 };
		let list = PostList::new(Layout::default(), "My posts", "/my-posts", &paginate, posts(1));

		assert_eq!(list.posts.len(), 1);
		assert_eq!(list.previous.as_deref(), Some("/my-posts?page=1&size=2"));
		assert_eq!(list.next, None);
	}
}
