/// An error originating from an external collaborator (search, router or storage)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a calculation did not produce a result.
/// The [`std::fmt::Display`] of each variant is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error("Please select a valid origin and destination.")]
    MissingLocations,
    #[error("Could not compute a ground route between these locations.")]
    RouteUnavailable,
    #[error("Error calculating the route. Please try again.")]
    Transient(#[source] Error),
}
