// Client data layer exports
pub mod catalog;
pub mod instructions;
pub mod session;
pub mod transform;

pub use instructions::{parse_html_instructions, split_sentences, strip_html};
pub use session::{Completion, Notification, NotificationVariant, Phase, RequestToken, SearchSession, SessionError};
pub use transform::{extract_nutrition, transform_detail, transform_search_response, TransformError};
