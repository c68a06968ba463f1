// Upload jobs
use crate::config::{TransferOptions, UploadJob};
use crate::transfer::progress::ProgressTracker;
use crate::transfer::RemoteSession;
use crate::utils::error::{Result, Step, TransferError};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{self, Write};

/// Streams one local file to the server, then deletes the local copy if the job asks for it.
/// Returns the number of bytes sent.
pub fn upload<S: RemoteSession>(
    session: &mut S,
    job: &UploadJob,
    options: &TransferOptions,
) -> Result<u64> {
    let local_path = job.local_path.as_path();
    let remote_path = job.remote_path.as_str();
    info!("Uploading {} -> {}", local_path.display(), remote_path);

    let mut local_file =
        File::open(local_path).map_err(|e| TransferError::local(Step::OpenLocal, local_path, e))?;

    let mut remote_file = session
        .create(remote_path)
        .map_err(|e| TransferError::remote(Step::CreateRemote, remote_path, e))?;

    let progress = ProgressTracker::new(&format!("Uploading {}", local_path.display()), options.show_progress);
    let copied = io::copy(&mut progress.wrap_read(&mut local_file), &mut remote_file)
        .and_then(|n| remote_file.flush().map(|_| n));
    let bytes = match copied {
        Ok(n) => n,
        Err(source) => {
            progress.finish_with_error(&source.to_string());
            return Err(TransferError::Copy {
                from: local_path.display().to_string(),
                to: remote_path.to_string(),
                source,
            });
        }
    };
    drop(local_file);

    session
        .close_write(remote_file)
        .map_err(|e| TransferError::remote(Step::FinishRemote, remote_path, e))?;
    progress.finish();

    if job.delete_local_file_after_upload {
        fs::remove_file(local_path).map_err(|e| TransferError::local(Step::DeleteLocal, local_path, e))?;
        debug!("Deleted local file {}", local_path.display());
    }

    println!("Uploaded {} ({} bytes)", remote_path, bytes);
    Ok(bytes)
}
