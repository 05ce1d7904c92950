// src/export.rs

use std::fs;
use std::io;
use std::path::PathBuf;

/// The export sink: takes a formatted report and a key, writes
/// `board_<key>.txt` under the export directory and hands back the
/// location of the written file.
#[derive(Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    pub fn write(&self, key: &str, text: &str) -> io::Result<String> {
        let path = self.out_dir.join(format!("board_{}.txt", key));
        fs::write(&path, text)?;
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_the_report_and_returns_its_location() {
        let dir = tempdir().unwrap();
        let exporter = TextExporter::new(dir.path().join("out")).unwrap();

        let location = exporter.write("3", "Board: Sprint1\n").unwrap();
        assert!(location.ends_with("board_3.txt"));
        assert_eq!(fs::read_to_string(location).unwrap(), "Board: Sprint1\n");
    }
}
