//! JSONL snapshot reader: one scored post per line

use super::normalizer::ScoredPost;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Default)]
pub struct JsonlSnapshot {
    pub posts: Vec<ScoredPost>,
    /// Lines that were not valid post JSON
    pub malformed_lines: usize,
}

/// Read every post in the file. Blank lines are ignored and malformed
/// lines are logged and counted, never fatal.
pub async fn read_posts_jsonl(path: impl AsRef<Path>) -> std::io::Result<JsonlSnapshot> {
    let path = path.as_ref();
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut snapshot = JsonlSnapshot::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match ScoredPost::from_jsonl(line) {
            Ok(post) => snapshot.posts.push(post),
            Err(e) => {
                log::warn!("Failed to parse post at {}:{}: {}", path.display(), line_no, e);
                snapshot.malformed_lines += 1;
            }
        }
    }

    log::info!(
        "📖 Read {} posts from {} ({} malformed lines)",
        snapshot.posts.len(),
        path.display(),
        snapshot.malformed_lines
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_read_with_malformed_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id":"1","username":"alice","text":"gm","score":1.4,"created_at":"2025-01-01T00:00:00Z"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id":"2","username":"bob""#).unwrap();
        writeln!(file, r#"{{"id":"3","author_handle":"carol","score":null}}"#).unwrap();
        file.flush().unwrap();

        let snapshot = read_posts_jsonl(file.path()).await.unwrap();

        assert_eq!(snapshot.posts.len(), 2);
        assert_eq!(snapshot.malformed_lines, 1);
        assert_eq!(snapshot.posts[0].author_handle, "alice");
        assert!(snapshot.posts[1].score.is_nan());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_posts_jsonl(dir.path().join("missing.jsonl")).await;

        assert!(result.is_err());
    }
}
