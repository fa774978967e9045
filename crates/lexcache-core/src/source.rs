//! The fixed list of legal texts tracked by the cache.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// One tracked document: its key and the page it is scraped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Document-type key, e.g. `codigo-civil`.
    #[serde(rename = "type")]
    pub law_type: String,
    pub url: String,
}

impl DocumentSource {
    pub fn new(law_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            law_type: law_type.into(),
            url: url.into(),
        }
    }
}

const CATALOGUE: &[(&str, &str)] = &[
    (
        "codigo-civil",
        "https://www.planalto.gov.br/ccivil_03/Leis/2002/L10406compilada.htm",
    ),
    (
        "processo-civil",
        "https://www.planalto.gov.br/ccivil_03/decreto-lei/1937-1946/del1608.htm",
    ),
    (
        "eleitoral",
        "https://www.planalto.gov.br/ccivil_03/Leis/L4737compilado.htm",
    ),
    (
        "codigo-comercial",
        "https://www.planalto.gov.br/ccivil_03/leis/lim/LIM556compilado.htm",
    ),
    (
        "codigo-penal",
        "https://www.planalto.gov.br/ccivil_03/decreto-lei/del2848compilado.htm",
    ),
    (
        "constituicao-federal",
        "https://www.planalto.gov.br/ccivil_03/constituicao/ConstituicaoCompilado.htm",
    ),
    (
        "codigo-tributario",
        "https://www.planalto.gov.br/ccivil_03/leis/L5172Compilado.htm",
    ),
    (
        "leis-trabalho",
        "https://www.planalto.gov.br/ccivil_03/decreto-lei/Del5452compilado.htm",
    ),
    (
        "defesa-consumidor",
        "https://www.planalto.gov.br/ccivil_03/leis/l8078compilado.htm",
    ),
    (
        "advocacia",
        "https://www.planalto.gov.br/ccivil_03/leis/l8906.htm",
    ),
    (
        "estatuto-deficiencia",
        "https://www.planalto.gov.br/ccivil_03/_ato2015-2018/2015/lei/l13146.htm",
    ),
];

/// The built-in source list, in processing order.
pub fn catalogue() -> Vec<DocumentSource> {
    CATALOGUE
        .iter()
        .map(|(law_type, url)| DocumentSource::new(*law_type, *url))
        .collect()
}

#[derive(Debug, Error)]
pub enum SourcesError {
    #[error("cannot read sources file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid sources file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("sources file {0} lists no documents")]
    Empty(PathBuf),
}

/// Load a replacement catalogue from a JSON array of `{ "type", "url" }` objects.
pub fn load_sources(path: &Path) -> Result<Vec<DocumentSource>, SourcesError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourcesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sources: Vec<DocumentSource> =
        serde_json::from_str(&raw).map_err(|source| SourcesError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if sources.is_empty() {
        return Err(SourcesError::Empty(path.to_path_buf()));
    }
    info!(count = sources.len(), path = %path.display(), "loaded document sources");
    Ok(sources)
}
