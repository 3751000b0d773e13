//! Authentication routes.

mod login;
mod logout;
mod refresh;
mod send_code;
mod set_password;

pub use login::{login_with_code, login_with_password};
pub use logout::logout;
pub use refresh::refresh;
pub use send_code::send_code;
pub use set_password::set_password;
