//! [`Store`] persists a [`GenerationResult`] as a timestamped text file.
//!
//! The file format is fixed (see [`render`]) and files are only ever created,
//! never rewritten: if a name is taken, a counter is appended instead.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::generation::GenerationResult;

/// Result type for the store. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Saving failed. The session reports this and carries on.
#[derive(Debug, thiserror::Error)]
#[error("could not write `{}`: {source}", .path.display())]
pub struct Error {
    /// File or directory that could not be written.
    pub path: PathBuf,
    /// Underlying I/O error.
    pub source: io::Error,
}

/// First line of every artifact.
pub const HEADER: &str = "=== AI Generated Recipe ===";
/// Line separating the metadata from the recipe.
pub const RULE: &str = "==================================================";
/// Timestamp format inside the artifact.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Timestamp format of file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render the artifact text for `result`.
pub fn render(result: &GenerationResult) -> String {
    let mut text = format!(
        "{HEADER}\n\nGenerated on: {}\nInput ingredients: {}\n",
        result.timestamp().format(TIMESTAMP_FORMAT),
        result.ingredients(),
    );

    let preferences = result.preferences();
    if !preferences.dietary.is_empty() {
        text.push_str(&format!(
            "Dietary restrictions: {}\n",
            preferences.dietary
        ));
    }
    if !preferences.cuisine.is_empty() {
        text.push_str(&format!("Cuisine type: {}\n", preferences.cuisine));
    }

    text.push_str(&format!("\n{RULE}\n\n"));

    // `Outcome`'s `Display` is the recipe text or "Error: <message>".
    text.push_str(&result.outcome().to_string());

    text
}

/// File name for an artifact created at `now`, with an optional
/// disambiguating counter.
pub fn file_name(now: NaiveDateTime, counter: u32) -> String {
    let stamp = now.format(FILE_STAMP_FORMAT);
    if counter == 0 {
        format!("recipe_{stamp}.txt")
    } else {
        format!("recipe_{stamp}_{counter}.txt")
    }
}

/// Saves artifacts into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Create a store writing into `dir`. Nothing is created until the first
    /// save.
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    /// Directory artifacts are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `result`, naming the file after the current local time. Returns
    /// the path written.
    pub fn save(&self, result: &GenerationResult) -> Result<PathBuf> {
        self.save_at(result, Local::now().naive_local())
    }

    /// Save `result`, naming the file after `now`. If that name exists
    /// already, `_1`, `_2`, … is appended until a free name is found.
    pub fn save_at(
        &self,
        result: &GenerationResult,
        now: NaiveDateTime,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| Error {
            path: self.dir.clone(),
            source,
        })?;

        let text = render(result);

        for counter in 0..u32::MAX {
            let path = self.dir.join(file_name(now, counter));
            let mut file =
                match OpenOptions::new().write(true).create_new(true).open(&path)
                {
                    Ok(file) => file,
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        #[cfg(feature = "log")]
                        log::debug!(
                            "`{}` exists, trying next name",
                            path.display()
                        );
                        continue;
                    }
                    Err(source) => return Err(Error { path, source }),
                };

            file.write_all(text.as_bytes())
                .and_then(|_| file.flush())
                .map_err(|source| Error {
                    path: path.clone(),
                    source,
                })?;

            #[cfg(feature = "log")]
            log::info!("Saved recipe to `{}`", path.display());

            return Ok(path);
        }

        Err(Error {
            path: self.dir.clone(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free file name left",
            ),
        })
    }
}
