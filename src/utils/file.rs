use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Permissions for files written by downloads (owner read/write only).
pub const DOWNLOAD_FILE_MODE: u32 = 0o600;

/// Create or truncate `path` for writing. New files get `DOWNLOAD_FILE_MODE` on Unix.
pub fn create_private_file<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(DOWNLOAD_FILE_MODE);
    }

    options.open(path)
}
