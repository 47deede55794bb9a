#[derive(Debug, thiserror::Error)]
pub enum GcloudError {
    #[error("{program} not found; install it from https://cloud.google.com/sdk/docs/install")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("gcloud command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("gcloud output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
