pub mod chat_client;
pub mod execution;
pub mod response_handler;
