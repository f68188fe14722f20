pub mod message;
pub mod profile;
pub mod session;

pub use message::{Message, Role};
pub use profile::{CompletedProfile, Difficulty, InterviewType, Profile, UploadedFile};
pub use session::SessionToken;
