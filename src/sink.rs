use std::path::{Path, PathBuf};

use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

use crate::{info_time, Error, Result};

/// Where response bodies end up: one line each in an append-only file, or the log.
#[derive(Debug)]
pub enum Sink {
    File { path: PathBuf, file: File },
    Log,
}

impl Sink {
    /// Opens the output file once for the whole run, creating it if needed.
    /// Without a path nothing is touched on disk.
    pub async fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Sink::Log);
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|source| Error::OutputOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Sink::File {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Writes `body` followed by a single `\n`, byte for byte.
    pub async fn write_record(&mut self, body: &[u8]) -> Result<()> {
        match self {
            Sink::File { path, file } => {
                let mut line = Vec::with_capacity(body.len() + 1);
                line.extend_from_slice(body);
                line.push(b'\n');

                let res = async {
                    file.write_all(&line).await?;
                    file.flush().await
                }
                .await;
                res.map_err(|source| Error::OutputWrite {
                    path: path.clone(),
                    source,
                })
            }
            Sink::Log => {
                info_time!("{}", String::from_utf8_lossy(body));
                Ok(())
            }
        }
    }

    pub async fn close(self) -> Result<()> {
        if let Sink::File { path, mut file } = self {
            let res = async {
                file.flush().await?;
                file.sync_all().await
            }
            .await;
            res.map_err(|source| Error::OutputWrite { path, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sink_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = Sink::open(None).await.unwrap();
        assert!(matches!(sink, Sink::Log));

        sink.write_record(br#"{"id":1}"#).await.unwrap();
        sink.close().await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scopes.jsonl");
        std::fs::write(&path, "{\"id\":0}\n").unwrap();

        let mut sink = Sink::open(Some(&path)).await.unwrap();
        sink.write_record(br#"{"id":1}"#).await.unwrap();
        sink.write_record(b"").await.unwrap();
        sink.write_record(b"not json\r").await.unwrap();
        sink.close().await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, b"{\"id\":0}\n{\"id\":1}\n\nnot json\r\n");
    }

    #[tokio::test]
    async fn test_file_sink_open_fails_in_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scopes.jsonl");

        let res = Sink::open(Some(&path)).await;
        assert!(matches!(res, Err(Error::OutputOpen { .. })));
    }
}
