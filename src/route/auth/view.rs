use askama::Template;

use crate::view::{page, Layout};

#[derive(Template)]
#[template(path = "login.html")]
pub struct Login {
	pub layout: Layout,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct Register {
	pub layout: Layout,
}

page!(Login, Register);
