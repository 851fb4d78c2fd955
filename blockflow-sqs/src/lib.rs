pub mod send_message {
    pub mod config;
    pub mod processor;
}
pub mod receive_message {
    pub mod config;
    pub mod processor;
}
