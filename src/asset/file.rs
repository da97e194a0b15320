use super::{parse_glb, LoadError, LoadEvent, LoadQueue, ModelData};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 64 * 1024;

/// Reads and parses a model file, reporting progress after every chunk.
pub fn load_file(
    path: &Path,
    mut on_progress: impl FnMut(u64, Option<u64>),
) -> Result<ModelData, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let total = file.metadata().map(|m| m.len()).ok();

    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0_u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk).map_err(io_error)?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        on_progress(bytes.len() as u64, total);
    }

    parse_glb(&bytes)
}

/// Loads `path` on a worker thread; the returned queue yields progress
/// events followed by one `Finished`.
pub fn spawn_file_load(path: impl Into<PathBuf>) -> LoadQueue {
    let path = path.into();
    let (tx, rx) = super::channel();

    let spawned = std::thread::Builder::new()
        .name("model-loader".to_owned())
        .spawn({
            let tx = tx.clone();
            let path = path.clone();
            move || {
                let result = load_file(&path, |loaded, total| tx.progress(loaded, total));
                tx.send(LoadEvent::Finished(result));
            }
        });

    if let Err(source) = spawned {
        tx.send(LoadEvent::Finished(Err(LoadError::Io {
            path: path.display().to_string(),
            source,
        })));
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/definitely/not/here.glb"), |_, _| {}).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("here.glb"));
    }

    #[test]
    fn worker_reports_failure_through_queue() {
        let mut queue = spawn_file_load("/definitely/not/here.glb");
        let finished = loop {
            if let Some(event) = queue
                .drain()
                .into_iter()
                .find(|e| matches!(e, LoadEvent::Finished(_)))
            {
                break event;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(matches!(finished, LoadEvent::Finished(Err(LoadError::Io { .. }))));
    }
}
