pub mod history;
pub mod navigator;
pub mod resolve;
pub mod search;
