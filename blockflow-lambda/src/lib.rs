pub mod invoke {
    pub mod config;
    pub mod processor;
}
pub mod add_permission {
    pub mod config;
    pub mod processor;
}
