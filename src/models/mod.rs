mod user;
mod forms;
mod alumni;
mod comment;
mod profile;
mod session;

pub use user::{Credentials, verify_password};
pub use forms::{AuthAction, AuthForm, AlumniForm, CommentForm, ProfileForm, FlashQuery};
pub use alumni::{AlumniList, AddOutcome};
pub use comment::{Comment, CommentLine, timestamp_now};
pub use profile::{ProfileInfo, profile_file_name};
pub use session::{UserSession, SESSION_KEY};
