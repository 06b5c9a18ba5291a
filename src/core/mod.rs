pub mod composer;
pub mod dispatcher;
pub mod gate;
pub mod handler;

pub use crate::domain::model::{DispatchOutcome, NotificationMessage, SubmissionPayload};
pub use crate::domain::ports::{ConfigProvider, Dispatcher};
pub use crate::utils::error::Result;
