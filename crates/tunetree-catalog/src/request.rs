//! Decoding of form-style catalog requests.
//!
//! Browser clients post a function name and a single data string. The
//! function name selects the operation; the data string is its argument (a
//! path, a query, or a serialized folder list).

/// A decoded catalog request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogRequest {
    /// `dir`: one directory level.
    Browse { path: String },
    /// `searchTitle`: audio files whose path contains the query.
    SearchTitles { query: String },
    /// `searchDir`: directories whose path contains the query.
    SearchDirs { query: String },
    /// `getAllMp3`: every audio file.
    AllAudioFiles,
    /// `getAllMp3InDir`: every audio file under one folder.
    AllAudioFilesUnder { path: String },
    /// `getAllMp3InDirs`: union over a JSON list of folders.
    AggregateFiles { payload: String },
    /// `getAllDirs`: every directory, root first.
    AllDirectories,
    /// Anything else.
    Unknown { function: String },
}

impl CatalogRequest {
    /// Build a request from a function name and its data argument.
    pub fn from_form(function: &str, data: &str) -> Self {
        let data = data.to_string();
        match function {
            "dir" => Self::Browse { path: data },
            "searchTitle" => Self::SearchTitles { query: data },
            "searchDir" => Self::SearchDirs { query: data },
            "getAllMp3" => Self::AllAudioFiles,
            "getAllMp3InDir" => Self::AllAudioFilesUnder { path: data },
            "getAllMp3InDirs" => Self::AggregateFiles { payload: data },
            "getAllDirs" => Self::AllDirectories,
            other => Self::Unknown {
                function: other.to_string(),
            },
        }
    }

    /// The wire name of the requested function.
    pub fn function_name(&self) -> &str {
        match self {
            Self::Browse { .. } => "dir",
            Self::SearchTitles { .. } => "searchTitle",
            Self::SearchDirs { .. } => "searchDir",
            Self::AllAudioFiles => "getAllMp3",
            Self::AllAudioFilesUnder { .. } => "getAllMp3InDir",
            Self::AggregateFiles { .. } => "getAllMp3InDirs",
            Self::AllDirectories => "getAllDirs",
            Self::Unknown { function } => function,
        }
    }

    /// Name of the client-side handler that consumes the response.
    pub fn callback(&self) -> &'static str {
        match self {
            Self::Browse { .. } => "getBrowserData",
            Self::SearchTitles { .. } => "getSearchTitle",
            Self::SearchDirs { .. } => "getSearchDir",
            Self::AllAudioFiles | Self::AllAudioFilesUnder { .. } | Self::AggregateFiles { .. } => {
                "getAllMp3Data"
            }
            Self::AllDirectories => "getAllDirsData",
            Self::Unknown { .. } => "default",
        }
    }
}
