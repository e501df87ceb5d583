//! Page objects for the BookCart screens.

pub mod home;
pub mod login;
pub mod register;

pub use home::HomePage;
pub use login::LoginPage;
pub use register::RegisterPage;
