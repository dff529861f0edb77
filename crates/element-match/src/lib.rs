pub mod criteria;
pub mod document;
pub mod error;
pub mod matcher;
pub mod path;
pub mod ranking;
