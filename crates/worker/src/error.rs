use lingosheet_providers::ProviderError;
use lingosheet_spreadsheet::WorkbookError;

/// Everything that can end a translation job early.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A single cell could not be translated; the whole job is abandoned.
    #[error("Error translating cell {cell} in sheet '{sheet}': {source}")]
    CellTranslation {
        cell: String,
        sheet: String,
        #[source]
        source: ProviderError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking workbook task was cancelled or panicked.
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Worker panicked: {0}")]
    Panicked(String),

    #[error("Server is shutting down")]
    ShuttingDown,
}
