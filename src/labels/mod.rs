mod store;

pub use store::{LabelMap, LabelStore};
