//! Model asset loading
//!
//! A model is fetched as raw bytes (file read natively, HTTP GET in the
//! browser), parsed from binary glTF into CPU-side meshes, and delivered to
//! the viewer as a stream of [`LoadEvent`]s ending in exactly one
//! `Finished`.

mod gltf_model;
mod queue;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use gltf_model::{parse_glb, MeshData, ModelData};
pub use queue::{channel, LoadQueue, LoadSender};

#[cfg(not(target_arch = "wasm32"))]
pub use file::{load_file, spawn_file_load};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP {status} while fetching {url}")]
    Http { url: String, status: u16 },
    #[error("request for {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model has no triangle meshes")]
    EmptyScene,
}

/// Bytes received so far, and the total when the source reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.loaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }

    /// Status line for the page's loading element.
    pub fn label(&self) -> String {
        match self.percent() {
            Some(percent) => format!("Loading... {percent:.0}%"),
            None => "Loading...".to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Finished(Result<ModelData, LoadError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_with_known_total() {
        let progress = LoadProgress {
            loaded: 421,
            total: Some(1000),
        };
        assert_eq!(progress.label(), "Loading... 42%");

        let done = LoadProgress {
            loaded: 1000,
            total: Some(1000),
        };
        assert_eq!(done.label(), "Loading... 100%");
    }

    #[test]
    fn label_without_total() {
        let unknown = LoadProgress {
            loaded: 12,
            total: None,
        };
        assert_eq!(unknown.label(), "Loading...");

        let zero = LoadProgress {
            loaded: 12,
            total: Some(0),
        };
        assert_eq!(zero.label(), "Loading...");
    }
}
