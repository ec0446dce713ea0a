pub mod conversation_service;
pub mod jwt_service;
pub mod message_service;
pub mod read_state_service;
