pub mod attempt;
pub mod bundle;
pub mod course;
pub mod draft;
pub mod envelope;
pub mod loaders;
pub mod package;
pub mod purchase;
pub mod question;
pub mod quiz;
pub mod referral;
pub mod user;

pub use attempt::{AnswerSlot, AttemptAnswerDetail, AttemptResult, AttemptSubmission, AttemptSummary};
pub use bundle::{Bundle, BundlePackage};
pub use course::{Course, CourseQuestionStats};
pub use draft::{DraftAnswer, DraftQuestion, DraftSet};
pub use envelope::ResponseEnvelope;
pub use loaders::{load_all_draft_sets, load_draft_set};
pub use package::{Package, PackageQuestion};
pub use purchase::{Purchase, PurchaseItem};
pub use question::{Answer, Question};
pub use quiz::Quiz;
pub use referral::ReferralCode;
pub use user::{AdminStatus, SignInData, User};
