//! COMBINE archive reading and writing.
//!
//! A COMBINE archive is a zip file with a `manifest.xml` at its root listing
//! every contained file and its format URI.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use biosim_domain::{ArchiveFormat, Format};
use tracing::debug;
use zip::write::SimpleFileOptions;

use crate::error::{CombineError, Result};
use crate::xml;

/// Name of the manifest at the root of every archive.
pub const MANIFEST_FILENAME: &str = "manifest.xml";

/// Format URI of the manifest itself.
pub const MANIFEST_SPEC_URL: &str = "http://identifiers.org/combine.specifications/omex-manifest";

const MANIFEST_NAMESPACE: &str = "http://identifiers.org/combine.specifications/omex-manifest";

/// A file listed in an archive manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveFile {
    /// Path relative to the archive root, without a leading `./`.
    pub filename: String,

    /// Format, identified by its specification URL.
    pub format: Format,

    /// Whether the manifest marks this file as the archive's entry point.
    pub master: bool,
}

impl ArchiveFile {
    pub fn new(filename: impl Into<String>, spec_url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: Format::from_spec_url(spec_url),
            master: false,
        }
    }

    pub fn as_master(mut self) -> Self {
        self.master = true;
        self
    }
}

/// The contents of a COMBINE archive, as declared by its manifest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombineArchive {
    pub files: Vec<ArchiveFile>,
}

impl CombineArchive {
    /// Files whose format has the given specification URL.
    pub fn files_with_spec_url<'a>(
        &'a self,
        spec_url: &'a str,
    ) -> impl Iterator<Item = &'a ArchiveFile> + 'a {
        self.files.iter().filter(move |f| f.format.has_spec_url(spec_url))
    }

    pub fn master_file(&self) -> Option<&ArchiveFile> {
        self.files.iter().find(|f| f.master)
    }
}

/// Unpack `archive_path` into `out_dir` and return its manifest.
pub fn read_archive(archive_path: &Path, out_dir: &Path) -> Result<CombineArchive> {
    let mut zip = zip::ZipArchive::new(File::open(archive_path)?)?;
    std::fs::create_dir_all(out_dir)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let relative: PathBuf = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => return Err(CombineError::UnsafeEntry(entry.name().to_string())),
        };
        let target = out_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;
    }

    let manifest_path = out_dir.join(MANIFEST_FILENAME);
    if !manifest_path.is_file() {
        return Err(CombineError::MissingManifest(archive_path.to_path_buf()));
    }
    let archive = parse_manifest(&std::fs::read_to_string(&manifest_path)?)?;

    debug!(
        archive = %archive_path.display(),
        files = archive.files.len(),
        "Unpacked COMBINE archive"
    );
    Ok(archive)
}

/// Zip the files of `archive` from `source_dir` into `archive_path`, together
/// with a generated manifest.
pub fn write_archive(archive: &CombineArchive, source_dir: &Path, archive_path: &Path) -> Result<()> {
    let mut zip = zip::ZipWriter::new(File::create(archive_path)?);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in &archive.files {
        let source = source_dir.join(&file.filename);
        zip.start_file(file.filename.as_str(), options)?;
        std::io::copy(&mut File::open(&source)?, &mut zip)?;
    }

    zip.start_file(MANIFEST_FILENAME, options)?;
    zip.write_all(render_manifest(archive).as_bytes())?;
    zip.finish()?;

    debug!(
        archive = %archive_path.display(),
        files = archive.files.len(),
        "Wrote COMBINE archive"
    );
    Ok(())
}

fn render_manifest(archive: &CombineArchive) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<omexManifest xmlns=\"{MANIFEST_NAMESPACE}\">\n"));
    out.push_str(&format!(
        "  <content location=\".\" format=\"{}\"/>\n",
        ArchiveFormat::Combine.spec_url()
    ));
    out.push_str(&format!(
        "  <content location=\"./{MANIFEST_FILENAME}\" format=\"{MANIFEST_SPEC_URL}\"/>\n"
    ));
    for file in &archive.files {
        let format = file.format.spec_url.as_deref().unwrap_or_default();
        out.push_str(&format!(
            "  <content location=\"./{}\" format=\"{}\"{}/>\n",
            xml::escape(&file.filename),
            xml::escape(format),
            if file.master { " master=\"true\"" } else { "" }
        ));
    }
    out.push_str("</omexManifest>\n");
    out
}

fn parse_manifest(text: &str) -> Result<CombineArchive> {
    let root = xml::parse(text, "COMBINE manifest")?;
    if root.name != "omexManifest" {
        return Err(CombineError::invalid(
            "COMBINE manifest",
            format!("unexpected root element <{}>", root.name),
        ));
    }

    let mut files = Vec::new();
    for content in root.children_named("content") {
        let location = content.required_attr("location", "COMBINE manifest")?;
        let filename = location.trim_start_matches("./");
        if filename.is_empty() || filename == "." || filename == MANIFEST_FILENAME {
            continue;
        }
        let format = content.required_attr("format", "COMBINE manifest")?;
        files.push(ArchiveFile {
            filename: filename.to_string(),
            format: Format::from_spec_url(format),
            master: content.attr("master") == Some("true"),
        });
    }

    Ok(CombineArchive { files })
}
