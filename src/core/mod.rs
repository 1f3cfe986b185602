pub mod engine;
pub mod network;
pub mod pipeline;
pub mod validator;

pub use crate::domain::model::{BatchResult, BatchSummary, InstrumentRecord};
pub use crate::domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
