//! Events sent from the backend worker to the UI thread.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    WorkerReady { server_url: String },
    WorkerFailed(String),
}

impl UiEvent {
    pub fn status_line(&self) -> String {
        match self {
            UiEvent::WorkerReady { server_url } => format!("Connected to {server_url}"),
            UiEvent::WorkerFailed(reason) => format!("Backend worker startup failure: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines_name_the_server_or_the_failure() {
        let ready = UiEvent::WorkerReady {
            server_url: "http://127.0.0.1:5000".to_string(),
        };
        assert_eq!(ready.status_line(), "Connected to http://127.0.0.1:5000");

        let failed = UiEvent::WorkerFailed("invalid server url".to_string());
        assert_eq!(
            failed.status_line(),
            "Backend worker startup failure: invalid server url"
        );
    }
}
