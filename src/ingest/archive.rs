/// Alert bundle extraction.
///
/// AEMET's `datos` URL for CAP warnings answers with whatever it has at hand:
/// usually a tar.gz of one CAP file per zone, sometimes a plain tar (whose
/// first bytes are the first member's file name), occasionally a bare XML
/// document, and a JSON error body when something went wrong upstream.
/// `extract_documents` sniffs the buffer and returns the XML documents
/// inside, or says why there are none.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;

use crate::model::IngestError;

/// gzip magic number.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// What a fetched buffer turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveContents {
    /// Upstream answered with a JSON error payload.
    UpstreamError(String),
    /// One or more XML documents, in archive order.
    Documents(Vec<String>),
    /// A readable archive with no `.xml` members.
    NoDocuments,
    /// Matches none of the known shapes (or the tar stream is corrupt).
    NotAnArchive(String),
}

impl ArchiveContents {
    /// The documents, or an empty list for every non-document outcome.
    pub fn into_documents(self) -> Vec<String> {
        match self {
            ArchiveContents::Documents(docs) => docs,
            _ => Vec::new(),
        }
    }
}

/// Classifies `data` and returns the XML documents it carries.
///
/// Detection order:
/// 1. leading `{`/`[` that parses as JSON → `UpstreamError` with the
///    `descripcion` or `mensaje` message;
/// 2. leading `<` → the buffer itself is the single document;
/// 3. otherwise a tar stream, gunzipped first when it starts with `1F 8B`.
///
/// Tar members are materialized in a private temporary directory that is
/// removed when this function returns, on every path. Only local I/O
/// failures (e.g. the temp directory cannot be created) produce `Err`.
pub fn extract_documents(data: &[u8]) -> Result<ArchiveContents, IngestError> {
    extract_documents_in(data, &std::env::temp_dir())
}

/// `extract_documents` with an explicit parent for the scratch directory.
/// Each call still gets its own uniquely named directory beneath it.
pub fn extract_documents_in(data: &[u8], temp_root: &Path) -> Result<ArchiveContents, IngestError> {
    let trimmed = trim_leading(data);

    if trimmed.is_empty() {
        return Ok(ArchiveContents::NotAnArchive("empty response".to_string()));
    }

    if matches!(trimmed[0], b'{' | b'[') {
        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(trimmed) {
            return Ok(ArchiveContents::UpstreamError(upstream_message(&json)));
        }
    }

    if trimmed[0] == b'<' {
        let xml = String::from_utf8_lossy(trimmed).into_owned();
        return Ok(ArchiveContents::Documents(vec![xml]));
    }

    if data.starts_with(&GZIP_MAGIC) {
        extract_tar(GzDecoder::new(data), temp_root)
    } else {
        extract_tar(data, temp_root)
    }
}

/// Message of a JSON error payload (`descripcion`, then `mensaje`).
pub fn upstream_message(json: &serde_json::Value) -> String {
    ["descripcion", "mensaje"]
        .iter()
        .find_map(|key| json.get(key).and_then(|v| v.as_str()))
        .unwrap_or("Unknown JSON response")
        .to_string()
}

/// Skips ASCII whitespace and a UTF-8 byte-order mark.
fn trim_leading(data: &[u8]) -> &[u8] {
    let mut rest = data;
    loop {
        if let Some(stripped) = rest.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
            rest = stripped;
        } else if let Some((first, tail)) = rest.split_first() {
            if first.is_ascii_whitespace() {
                rest = tail;
            } else {
                return rest;
            }
        } else {
            return rest;
        }
    }
}

fn extract_tar<R: Read>(reader: R, temp_root: &Path) -> Result<ArchiveContents, IngestError> {
    // Dropped (and deleted) on every return below, including `?`.
    let workdir = tempfile::Builder::new().prefix("auxio_").tempdir_in(temp_root)?;

    let members = match unpack_xml_members(reader, &workdir) {
        Ok(members) => members,
        Err(e) => return Ok(ArchiveContents::NotAnArchive(format!("unreadable tar stream: {}", e))),
    };

    if members.is_empty() {
        return Ok(ArchiveContents::NoDocuments);
    }

    let mut documents = Vec::with_capacity(members.len());
    for path in members {
        let bytes = fs::read(&path)?;
        documents.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(ArchiveContents::Documents(documents))
}

/// Unpacks every `.xml` member into `workdir`, returning their paths in
/// archive order. Other members are never written.
///
/// Members land at `<index>.xml` regardless of their recorded name, so
/// absolute names and repeated names stay inside `workdir` and distinct.
fn unpack_xml_members<R: Read>(reader: R, workdir: &TempDir) -> std::io::Result<Vec<PathBuf>> {
    let mut archive = tar::Archive::new(reader);
    let mut members = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let is_xml = entry
            .path()?
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if !is_xml {
            continue;
        }

        let target = workdir.path().join(format!("{}.xml", members.len()));
        entry.unpack(&target)?;
        members.push(target);
    }

    Ok(members)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
