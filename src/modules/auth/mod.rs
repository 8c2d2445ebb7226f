//! Login and signup forms.

pub mod login;
pub mod models;
pub mod signup;

pub use login::LoginView;
pub use models::{Credentials, LoginResponse, Phase, SignupRequest};
pub use signup::{precheck, LoginRedirect, SignupCheck, SignupView};
