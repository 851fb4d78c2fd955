use crate::config::{AppConfig, FlowConfig};
use config::Config;
use std::sync::Arc;
use tracing::{error, info};

/// Errors that can occur during application execution.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid glob pattern provided for flow discovery.
    #[error("Invalid glob pattern: {source}")]
    Pattern {
        #[source]
        source: glob::PatternError,
    },
    /// Flow directory path is invalid or cannot be converted to string.
    #[error("Invalid path")]
    InvalidPath,
}

/// Main application that loads and runs flows concurrently.
pub struct App {
    /// Global application configuration.
    pub config: AppConfig,
}

impl App {
    /// Loads flow configurations from disk, builds flows, and runs all tasks
    /// concurrently.
    ///
    /// Flow configuration files are discovered with the glob pattern from the
    /// app config and parsed individually; a file that fails to parse is
    /// skipped so the remaining flows still run.
    #[tracing::instrument(skip(self), name = "app")]
    pub async fn start(self) -> Result<(), Error> {
        let app_config = Arc::new(self.config);

        let glob_pattern = app_config
            .flows
            .dir
            .as_ref()
            .and_then(|path| path.to_str())
            .ok_or(Error::InvalidPath)?;

        let flow_configs: Vec<FlowConfig> = glob::glob(glob_pattern)
            .map_err(|e| Error::Pattern { source: e })?
            .filter_map(|path| {
                match path {
                    Ok(path) => {
                        info!("Loading flow: {:?}", path);
                        let contents = match std::fs::read_to_string(&path) {
                            Ok(c) => c,
                            Err(e) => {
                                error!(
                                    "Failed to read flow file {:?}: {}. Skipping this flow.",
                                    path, e
                                );
                                return None;
                            }
                        };

                        // Determine file format from extension.
                        let file_format = match path.extension().and_then(|s| s.to_str()) {
                            Some("yaml") | Some("yml") => config::FileFormat::Yaml,
                            Some("json") => config::FileFormat::Json,
                            _ => config::FileFormat::Json,
                        };

                        let config = match Config::builder()
                            .add_source(config::File::from_str(&contents, file_format))
                            .build()
                        {
                            Ok(c) => c,
                            Err(e) => {
                                error!(
                                    "Failed to parse flow config {:?}: {}. Skipping this flow.",
                                    path, e
                                );
                                return None;
                            }
                        };

                        match config.try_deserialize::<FlowConfig>() {
                            Ok(flow_config) => Some(flow_config),
                            Err(e) => {
                                error!(
                                    "Failed to deserialize flow config {:?}: {}. Skipping this flow.",
                                    path, e
                                );
                                None
                            }
                        }
                    }
                    Err(e) => {
                        error!("Failed to read flow path: {}. Skipping.", e);
                        None
                    }
                }
            })
            .collect();

        // Build all flows from configuration files.
        let mut flows: Vec<super::flow::Flow> = Vec::new();
        for config in flow_configs {
            let mut flow_builder = super::flow::FlowBuilder::new().config(Arc::new(config));

            if let Some(buffer_size) = app_config.event_buffer_size {
                flow_builder = flow_builder.event_buffer_size(buffer_size);
            }

            match flow_builder.build() {
                Ok(flow) => flows.push(flow),
                Err(e) => {
                    error!("Flow build failed: {}", e);
                    continue;
                }
            };
        }

        // Initialize flow setup.
        for flow in &mut flows {
            if let Err(e) = flow.init() {
                error!("Flow initialization failed for {}: {}", flow.name(), e);
            }
        }

        // Start all background flow tasks.
        let mut background_handles = Vec::new();
        for flow in flows {
            background_handles.push(flow.run());
        }

        // Wait for all background flows to complete.
        let results = futures_util::future::join_all(background_handles).await;
        for result in results {
            if let Err(e) = result {
                error!("Background task panicked: {}", e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowOptions;
    use std::io::Write;

    #[tokio::test]
    async fn test_start_missing_flow_dir() {
        let app = App {
            config: AppConfig {
                flows: FlowOptions { dir: None },
                event_buffer_size: None,
            },
        };

        let result = app.start().await;
        assert!(matches!(result, Err(Error::InvalidPath)));
    }

    #[tokio::test]
    async fn test_start_empty_flow_dir() {
        let dir = std::env::temp_dir().join("blockflow_app_test_empty");
        std::fs::create_dir_all(&dir).unwrap();

        let app = App {
            config: AppConfig {
                flows: FlowOptions {
                    dir: Some(dir.join("*.yaml")),
                },
                event_buffer_size: None,
            },
        };

        app.start().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_skips_invalid_flow_file() {
        let dir = std::env::temp_dir().join("blockflow_app_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join("broken.json")).unwrap();
        file.write_all(b"{ not json").unwrap();

        let app = App {
            config: AppConfig {
                flows: FlowOptions {
                    dir: Some(dir.join("*.json")),
                },
                event_buffer_size: Some(32),
            },
        };

        // The broken file is skipped rather than aborting startup.
        app.start().await.unwrap();
    }
}
