pub mod client;
pub mod config;
pub mod event;
pub mod task {
    pub mod context;
    pub mod runner;
    pub mod generate {
        pub mod config;
        pub mod subscriber;
    }
    pub mod log {
        pub mod config;
        pub mod processor;
    }
}
