pub mod attempt_service;
pub mod auth_service;
pub mod bundle_service;
pub mod course_service;
pub mod package_service;
pub mod purchase_service;
pub mod question_service;
pub mod quiz_service;
pub mod referral_service;
pub mod report_writer;
pub mod richtext;

pub use attempt_service::AttemptService;
pub use auth_service::AuthService;
pub use bundle_service::{BundleInput, BundleService};
pub use course_service::CourseService;
pub use package_service::{PackageInput, PackageService};
pub use purchase_service::PurchaseService;
pub use question_service::{AnswerInput, QuestionInput, QuestionService};
pub use quiz_service::QuizService;
pub use referral_service::ReferralService;
pub use report_writer::ReportWriter;
pub use richtext::{NormalizedRichText, RichText, StyledSpan};
