use serde::Deserialize;

pub const MAX_PAGE_SIZE: i64 = 100;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn twenty() -> i64 {
	20
}

/// Out-of-range values are clamped rather than rejected.
#[derive(Debug, Deserialize)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[serde(default = "one")]
	pub page: i64,
	/// The number of items to return per page.
	#[serde(default = "twenty")]
	pub size: i64,
}

impl Default for Paginate {
	fn default() -> Self {
		Self {
			page: one(),
			size: twenty(),
		}
	}
}

impl Paginate {
	pub fn page(&self) -> i64 {
		self.page.max(1)
	}

	pub fn offset(&self) -> i64 {
		(self.page() - 1) * self.limit()
	}

	pub fn limit(&self) -> i64 {
		self.size.clamp(1, MAX_PAGE_SIZE)
	}

	/// Asks the database for one row past the page, to know whether a next page exists.
	pub fn fetch_limit(&self) -> i64 {
		self.limit() + 1
	}
}

#[cfg(test)]
mod test {
	#[test]
	fn test_paginate_offset() {
		let mut paginate = super::Paginate { page: 1, size: 10 };

		assert_eq!(paginate.offset(), 0);

		paginate.page = 2;

		assert_eq!(paginate.offset(), 10);

		paginate.size = 5;

		assert_eq!(paginate.offset(), 5);

		paginate.page = 3;

		assert_eq!(paginate.offset(), 10);
	}

	#[test]
	fn test_paginate_limit() {
		let paginate = super::Paginate { page: 1, size: 10 };

		assert_eq!(paginate.limit(), 10);
		assert_eq!(paginate.fetch_limit(), 11);
	}

	#[test]
	fn test_paginate_clamps() {
		let paginate = super::Paginate { page: -4, size: 1000 };

		assert_eq!(paginate.page(), 1);
		assert_eq!(paginate.offset(), 0);
		assert_eq!(paginate.limit(), super::MAX_PAGE_SIZE);

		let paginate = super::Paginate { page: 2, size: 0 };

		assert_eq!(paginate.limit(), 1);
		assert_eq!(paginate.offset(), 1);
	}

	#[test]
	fn test_paginate_defaults() {
		let paginate = super::Paginate::default();

		assert_eq!(paginate.page(), 1);
		assert_eq!(paginate.limit(), 20);
	}
}
