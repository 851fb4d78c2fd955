use handlebars::Handlebars;
use serde::{de::DeserializeOwned, Serialize};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Render(#[from] handlebars::RenderError),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Template rendering for task configurations.
///
/// Serializes the configuration to JSON, renders it as a handlebars template
/// against the triggering event's data, and deserializes the result. This is
/// how `{{placeholder}}` values in flow files resolve to event fields at
/// invocation time.
pub trait ConfigExt {
    fn render<T>(&self, data: &T) -> Result<Self, Error>
    where
        Self: Serialize + DeserializeOwned + Sized,
        T: Serialize,
    {
        let template = serde_json::to_string(self)?;
        let data = serde_json::to_value(data)?;

        let handlebars = Handlebars::new();
        let rendered = handlebars.render_template(&template, &data)?;

        let result: Self = serde_json::from_str(&rendered)?;
        Ok(result)
    }
}
