pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const QUIZZES: &str = "quizzes";
pub const COLLECTIONS: &str = "collections";
pub const QUIZ_RESULTS: &str = "quizResults";
pub const FAVORITE_QUIZZES: &str = "favoriteQuizzes";
pub const FOLLOWED_USERS: &str = "followedUsers";
pub const QUIZ_INVITES: &str = "quizInvites";
pub const RESET_OTP: &str = "resetOTP";
pub const RESET_EMAIL: &str = "resetEmail";
