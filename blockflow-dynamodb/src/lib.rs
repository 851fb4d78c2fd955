pub mod get_item {
    pub mod config;
    pub mod processor;
}
pub mod put_item {
    pub mod config;
    pub mod processor;
}
