pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration ({field}): {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Axis `{axis}` refers to unknown group `{group}`")]
    UnknownGroup { axis: String, group: String },

    #[error("Axis `{axis}` is defined more than once")]
    DuplicateAxis { axis: String },

    #[error("Group `{group}` is defined more than once")]
    DuplicateGroup { group: String },

    #[error("Chart has no axes")]
    NoAxes,

    #[error("Invalid color `{value}`: {message}")]
    InvalidColor { value: String, message: String },
}

impl Error {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
