use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

use sync_transfer::config::{Config, DownloadJob, TransferOptions, UploadJob};
use sync_transfer::transfer::{run_jobs, RemoteSession};
use sync_transfer::utils::error::{BoxError, Step, TransferError};

/// In-memory server that records every operation it is asked to perform.
#[derive(Default)]
struct MemoryRemote {
    files: HashMap<String, Vec<u8>>,
    ops: Vec<String>,
}

struct MemoryWriter {
    path: String,
    buf: Vec<u8>,
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MemoryRemote {
    fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }
}

impl RemoteSession for MemoryRemote {
    type Reader = Cursor<Vec<u8>>;
    type Writer = MemoryWriter;

    fn open(&mut self, path: &str) -> Result<Self::Reader, BoxError> {
        self.ops.push(format!("open {path}"));
        self.files
            .get(path)
            .cloned()
            .map(Cursor::new)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file").into())
    }

    fn close_read(&mut self, _reader: Self::Reader) -> Result<(), BoxError> {
        Ok(())
    }

    fn create(&mut self, path: &str) -> Result<Self::Writer, BoxError> {
        self.ops.push(format!("create {path}"));
        Ok(MemoryWriter {
            path: path.to_string(),
            buf: Vec::new(),
        })
    }

    fn close_write(&mut self, writer: Self::Writer) -> Result<(), BoxError> {
        self.files.insert(writer.path, writer.buf);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), BoxError> {
        self.ops.push(format!("remove {path}"));
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file").into())
    }
}

fn quiet() -> TransferOptions {
    TransferOptions { show_progress: false }
}

fn download_job(remote: &str, local: &Path, delete: bool) -> DownloadJob {
    DownloadJob {
        remote_path: remote.to_string(),
        local_path: local.to_path_buf(),
        delete_remote_file_after_download: delete,
    }
}

fn upload_job(local: &Path, remote: &str, delete: bool) -> UploadJob {
    UploadJob {
        local_path: local.to_path_buf(),
        remote_path: remote.to_string(),
        delete_local_file_after_upload: delete,
    }
}

fn sftp_config(downloads: Vec<DownloadJob>, uploads: Vec<UploadJob>) -> Config {
    Config {
        server: "files.example.com".into(),
        port: 22,
        protocol: "sftp".into(),
        files_to_download: downloads,
        files_to_upload: uploads,
        ..Config::default()
    }
}

#[test]
fn empty_job_lists_touch_nothing() {
    let mut remote = MemoryRemote::default().with_file("/keep.txt", b"x");
    run_jobs(&mut remote, &sftp_config(vec![], vec![]), &quiet()).unwrap();

    assert!(remote.ops.is_empty());
    assert_eq!(remote.files.len(), 1);
}

#[test]
fn download_then_delete_remote() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("orders.xml");
    let content: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();

    let mut remote = MemoryRemote::default().with_file("/outbox/orders.xml", &content);
    let config = sftp_config(vec![download_job("/outbox/orders.xml", &local, true)], vec![]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert_eq!(fs::read(&local).unwrap(), content);
    assert!(!remote.files.contains_key("/outbox/orders.xml"));
    assert_eq!(remote.ops, vec!["open /outbox/orders.xml", "remove /outbox/orders.xml"]);
}

#[test]
fn download_keeps_remote_without_flag() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.txt");

    let mut remote = MemoryRemote::default().with_file("/a.txt", b"hello");
    let config = sftp_config(vec![download_job("/a.txt", &local, false)], vec![]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert_eq!(fs::read(&local).unwrap(), b"hello");
    assert_eq!(remote.files.get("/a.txt").unwrap(), b"hello");
}

#[test]
fn download_overwrites_existing_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.txt");
    fs::write(&local, b"stale content that is longer").unwrap();

    let mut remote = MemoryRemote::default().with_file("/a.txt", b"fresh");
    let config = sftp_config(vec![download_job("/a.txt", &local, false)], vec![]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert_eq!(fs::read(&local).unwrap(), b"fresh");
}

#[cfg(unix)]
#[test]
fn downloaded_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("secret.key");

    let mut remote = MemoryRemote::default().with_file("/secret.key", b"k");
    let config = sftp_config(vec![download_job("/secret.key", &local, false)], vec![]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    let mode = fs::metadata(&local).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn upload_then_delete_local() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("report.csv");
    fs::write(&local, b"id,total\n1,42\n").unwrap();

    let mut remote = MemoryRemote::default();
    let config = sftp_config(vec![], vec![upload_job(&local, "/inbox/report.csv", true)]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert!(!local.exists());
    assert_eq!(remote.files.get("/inbox/report.csv").unwrap(), b"id,total\n1,42\n");
}

#[test]
fn upload_keeps_local_without_flag() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("report.csv");
    fs::write(&local, b"data").unwrap();

    let mut remote = MemoryRemote::default();
    let config = sftp_config(vec![], vec![upload_job(&local, "/inbox/report.csv", false)]);
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert!(local.exists());
    assert_eq!(remote.files.get("/inbox/report.csv").unwrap(), b"data");
}

#[test]
fn downloads_run_before_uploads_in_list_order() {
    let dir = tempfile::tempdir().unwrap();
    let up1 = dir.path().join("up1");
    let up2 = dir.path().join("up2");
    fs::write(&up1, b"1").unwrap();
    fs::write(&up2, b"2").unwrap();

    let mut remote = MemoryRemote::default()
        .with_file("/d1", b"a")
        .with_file("/d2", b"b");
    let config = sftp_config(
        vec![
            download_job("/d1", &dir.path().join("d1"), false),
            download_job("/d2", &dir.path().join("d2"), false),
        ],
        vec![upload_job(&up1, "/u1", false), upload_job(&up2, "/u2", false)],
    );
    run_jobs(&mut remote, &config, &quiet()).unwrap();

    assert_eq!(remote.ops, vec!["open /d1", "open /d2", "create /u1", "create /u2"]);
}

#[test]
fn failed_download_aborts_remaining_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let upload_src = dir.path().join("upload.txt");
    fs::write(&upload_src, b"never sent").unwrap();

    let mut remote = MemoryRemote::default()
        .with_file("/first", b"1")
        .with_file("/third", b"3");
    let config = sftp_config(
        vec![
            download_job("/first", &dir.path().join("first"), true),
            download_job("/missing", &dir.path().join("missing"), true),
            download_job("/third", &dir.path().join("third"), true),
        ],
        vec![upload_job(&upload_src, "/upload.txt", true)],
    );

    let err = run_jobs(&mut remote, &config, &quiet()).unwrap_err();
    match &err {
        TransferError::Remote { step, path, .. } => {
            assert_eq!(*step, Step::OpenRemote);
            assert_eq!(path, "/missing");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("open remote file"));

    // Work done before the failure stays done; nothing after it is attempted.
    assert_eq!(remote.ops, vec!["open /first", "remove /first", "open /missing"]);
    assert!(!remote.files.contains_key("/first"));
    assert!(remote.files.contains_key("/third"));
    assert!(!dir.path().join("missing").exists());
    assert!(!dir.path().join("third").exists());
    assert!(upload_src.exists());
}

#[test]
fn unwritable_local_path_keeps_remote_file() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("no-such-dir").join("file.txt");

    let mut remote = MemoryRemote::default().with_file("/file.txt", b"x");
    let config = sftp_config(vec![download_job("/file.txt", &local, true)], vec![]);
    let err = run_jobs(&mut remote, &config, &quiet()).unwrap_err();

    assert_eq!(err.step(), Some(Step::CreateLocal));
    assert!(remote.files.contains_key("/file.txt"));
}

#[test]
fn missing_local_file_stops_before_remote_create() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");

    let mut remote = MemoryRemote::default();
    let config = sftp_config(vec![], vec![upload_job(&missing, "/absent.txt", true)]);
    let err = run_jobs(&mut remote, &config, &quiet()).unwrap_err();

    match err {
        TransferError::Local { step, path, source } => {
            assert_eq!(step, Step::OpenLocal);
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(remote.ops.is_empty());
}

#[test]
fn upload_then_download_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("original.bin");
    let copy = dir.path().join("copy.bin");
    let content: Vec<u8> = (0..100_000u32).map(|i| (i * 31 % 251) as u8).collect();
    fs::write(&original, &content).unwrap();

    let mut remote = MemoryRemote::default();
    let push = sftp_config(vec![], vec![upload_job(&original, "/roundtrip.bin", false)]);
    run_jobs(&mut remote, &push, &quiet()).unwrap();

    let pull = sftp_config(vec![download_job("/roundtrip.bin", &copy, false)], vec![]);
    run_jobs(&mut remote, &pull, &quiet()).unwrap();

    assert_eq!(fs::read(&copy).unwrap(), content);
    assert_eq!(fs::read(&original).unwrap(), content);
}
