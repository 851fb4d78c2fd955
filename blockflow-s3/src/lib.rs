pub mod list_buckets {
    pub mod config;
    pub mod processor;
}
pub mod get_object {
    pub mod config;
    pub mod processor;
}
pub mod put_object {
    pub mod config;
    pub mod processor;
}
