#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("TOC file is empty or contains no headings")]
    EmptyToc,

    #[error("editor not found: {0}")]
    EditorNotFound(String),

    #[error("editor {0} exited with {1}")]
    EditorFailed(String, String),
}
