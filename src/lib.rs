pub mod analytics;
pub mod events;
pub mod fetch;
pub mod forms;
pub mod output;
pub mod parser;
