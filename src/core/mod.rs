pub mod chart;
pub mod export;
pub mod session;
pub mod store;

pub use crate::domain::model::{
    Label, Measurement, NewMeasurement, Reading, SearchQuery, Session, Subject,
};
pub use crate::domain::ports::{ConfigProvider, MeasurementRepository, Storage};
pub use crate::utils::error::Result;
