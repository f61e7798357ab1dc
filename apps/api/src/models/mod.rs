pub mod account;
pub mod cv;
pub mod cv_data;
pub mod document;
pub mod lenient;
