use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap of {} failed", path.display()))?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Plain => "plain",
            InputKind::Gzip => "gzip",
        }
    }
}

pub enum InputData {
    Mapped(MmapSource),
    Owned(Vec<u8>),
}

impl InputData {
    pub fn bytes(&self) -> &[u8] {
        match self {
            InputData::Mapped(source) => source.bytes(),
            InputData::Owned(buf) => buf,
        }
    }
}

pub struct Input {
    pub kind: InputKind,
    pub data: InputData,
}

impl Input {
    pub fn open(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        // Pipes and devices report no length and cannot be re-opened to sniff.
        if !meta.is_file() {
            return Self::read_stream(path);
        }
        let kind = detect_input_kind(path)?;
        let data = match kind {
            InputKind::Plain => {
                // Zero-length files cannot be mapped on every platform.
                if meta.len() == 0 {
                    InputData::Owned(Vec::new())
                } else {
                    InputData::Mapped(MmapSource::open(path)?)
                }
            }
            InputKind::Gzip => {
                let mut reader = open_gzip_reader(path)?;
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .with_context(|| format!("gzip decompression of {} failed", path.display()))?;
                InputData::Owned(buf)
            }
        };
        Ok(Self { kind, data })
    }

    fn read_stream(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut raw = Vec::new();
        file.read_to_end(&mut raw)
            .with_context(|| format!("failed to read {}", path.display()))?;

        if !has_gzip_extension(path) && !has_gzip_magic(&raw) {
            return Ok(Self {
                kind: InputKind::Plain,
                data: InputData::Owned(raw),
            });
        }
        let mut buf = Vec::new();
        MultiGzDecoder::new(&raw[..])
            .read_to_end(&mut buf)
            .with_context(|| format!("gzip decompression of {} failed", path.display()))?;
        Ok(Self {
            kind: InputKind::Gzip,
            data: InputData::Owned(buf),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.bytes()
    }
}

fn has_gzip_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

fn has_gzip_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x1f, 0x8b])
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if has_gzip_extension(path) {
        return Ok(InputKind::Gzip);
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| format!("failed to read magic bytes of {}", path.display()))?;
    if has_gzip_magic(&magic[..n]) {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

pub fn open_gzip_reader(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
}

/// Iterates the lines of `bytes`, split on `\n`. A final line without a
/// terminator is yielded; an empty tail after the last `\n` is not.
pub fn lines(bytes: &[u8]) -> Lines<'_> {
    Lines { bytes, pos: 0 }
}

pub struct Lines<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let rest = &self.bytes[self.pos..];
        match memchr::memchr(b'\n', rest) {
            Some(i) => {
                self.pos += i + 1;
                Some(&rest[..i])
            }
            None => {
                self.pos = self.bytes.len();
                Some(rest)
            }
        }
    }
}
