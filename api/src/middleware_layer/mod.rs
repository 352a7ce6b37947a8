pub mod json_rejection;
