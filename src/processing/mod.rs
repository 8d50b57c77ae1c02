pub mod summary;

pub use summary::{GravityReport, SurveyStamp};
