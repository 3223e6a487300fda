use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlantError {
    #[error("not initialized: run 'plantcare init'")]
    NotInitialized,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("plant not found: {0}")]
    PlantNotFound(String),

    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    #[error("task {0} is already resolved")]
    TaskAlreadyResolved(String),

    #[error("zone {0} has no employees to assign")]
    EmptyRoster(String),

    #[error("{0} was modified concurrently")]
    VersionConflict(String),

    #[error("invalid plant: {0}")]
    InvalidPlant(String),

    #[error("invalid zone: {0}")]
    InvalidZone(String),

    #[error("invalid interaction payload: {0}")]
    InvalidPayload(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("messaging error: {0}")]
    Slack(#[from] slack_client::SlackError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlantError>;
