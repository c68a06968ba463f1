// Download jobs
use crate::config::{DownloadJob, TransferOptions};
use crate::transfer::progress::ProgressTracker;
use crate::transfer::RemoteSession;
use crate::utils::error::{Result, Step, TransferError};
use crate::utils::file::create_private_file;
use log::{debug, info};
use std::io::{self, Write};

/// Streams one remote file to disk, then deletes the remote copy if the job asks for it.
/// Returns the number of bytes written.
pub fn download<S: RemoteSession>(
    session: &mut S,
    job: &DownloadJob,
    options: &TransferOptions,
) -> Result<u64> {
    let remote_path = job.remote_path.as_str();
    let local_path = job.local_path.as_path();
    info!("Downloading {} -> {}", remote_path, local_path.display());

    let mut remote_file = session
        .open(remote_path)
        .map_err(|e| TransferError::remote(Step::OpenRemote, remote_path, e))?;

    let mut local_file = create_private_file(local_path)
        .map_err(|e| TransferError::local(Step::CreateLocal, local_path, e))?;

    let progress = ProgressTracker::new(&format!("Downloading {}", remote_path), options.show_progress);
    let copied = io::copy(&mut progress.wrap_read(&mut remote_file), &mut local_file)
        .and_then(|n| local_file.flush().map(|_| n));
    let bytes = match copied {
        Ok(n) => n,
        Err(source) => {
            progress.finish_with_error(&source.to_string());
            return Err(TransferError::Copy {
                from: remote_path.to_string(),
                to: local_path.display().to_string(),
                source,
            });
        }
    };
    drop(local_file);

    session
        .close_read(remote_file)
        .map_err(|e| TransferError::remote(Step::FinishRemote, remote_path, e))?;
    progress.finish();

    if job.delete_remote_file_after_download {
        session
            .remove(remote_path)
            .map_err(|e| TransferError::remote(Step::DeleteRemote, remote_path, e))?;
        debug!("Deleted remote file {}", remote_path);
    }

    println!("Downloaded {} ({} bytes)", local_path.display(), bytes);
    Ok(bytes)
}
