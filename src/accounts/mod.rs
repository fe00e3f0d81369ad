mod error;
mod password;
mod password_reset;
mod session;
mod signup;

pub use error::{AccountError, FieldError};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use password_reset::PasswordReset;
pub use session::Session;
pub use signup::{is_valid_email, SignupForm};
