use thiserror::Error;

#[derive(Error, Debug)]
pub enum UndercroftError {
    #[error("prefab '{name}' cells do not match declared {width}x{height}")]
    PrefabShape {
        name: String,
        width: i32,
        height: i32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UndercroftError>;
