//! Ready-made filter hooks.
//!
//! Most filtering needs are a closure away; the hooks here cover the
//! patterns worth shipping with the crate.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::entry::EntryInfo;
use crate::error::ScourError;
use crate::traits::FilterHook;

// ---------------------------------------------------------------------------
// ExtensionFilter
// ---------------------------------------------------------------------------

/// Keeps entries whose extension is on an allow list.
///
/// Built via [`by_extension`]; matching is case-insensitive, and
/// directories (which carry no extension) never match.
#[derive(Debug)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

/// Builds an [`ExtensionFilter`] from a list of extensions.
///
/// Extensions are letters only, with or without the leading dot —
/// `"png"` and `".PNG"` name the same filter. Anything else fails
/// construction.
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), scour::ScourError> {
/// let images = scour::inspector()
///     .filter(scour::filters::by_extension(["png", "jpg", ".JPEG"])?)
///     .build()?
///     .search("./assets")
///     .await?;
/// println!("{} images", images.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// [`ScourError::InvalidExtension`] for any entry that is empty or
/// contains non-letter characters after the optional dot.
pub fn by_extension<I, S>(extensions: I) -> Result<ExtensionFilter, ScourError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = HashSet::new();
    for raw in extensions {
        let raw = raw.as_ref();
        let bare = raw.strip_prefix('.').unwrap_or(raw);
        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ScourError::InvalidExtension(raw.to_string()));
        }
        set.insert(format!(".{}", bare.to_lowercase()));
    }
    Ok(ExtensionFilter { extensions: set })
}

#[async_trait]
impl FilterHook for ExtensionFilter {
    async fn filter(&self, info: &EntryInfo) -> Result<bool, ScourError> {
        Ok(self.extensions.contains(&info.ext.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::UNIX_EPOCH;

    use super::*;

    fn info_with_ext(ext: &str) -> EntryInfo {
        EntryInfo {
            is_directory: false,
            hidden: false,
            relative: PathBuf::from("entry"),
            absolute: PathBuf::from("/entry"),
            size: 0,
            base: String::from("entry"),
            name: String::from("entry"),
            ext: ext.to_string(),
            created: UNIX_EPOCH,
            modified: UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn matches_extensions_case_insensitively() {
        let filter = by_extension(["png", ".GZ"]).unwrap();

        assert!(filter.filter(&info_with_ext(".PNG")).await.unwrap());
        assert!(filter.filter(&info_with_ext(".gz")).await.unwrap());
        assert!(!filter.filter(&info_with_ext(".txt")).await.unwrap());
        assert!(!filter.filter(&info_with_ext("")).await.unwrap());
    }

    #[tokio::test]
    async fn accepts_dotted_and_bare_forms() {
        let bare = by_extension(["fastq"]).unwrap();
        let dotted = by_extension([".fastq"]).unwrap();
        let info = info_with_ext(".fastq");

        assert!(bare.filter(&info).await.unwrap());
        assert!(dotted.filter(&info).await.unwrap());
    }

    #[test]
    fn rejects_malformed_extensions() {
        for bad in ["n0pe", "tar.gz", "", ".", "a-b"] {
            assert!(by_extension([bad]).is_err(), "{bad:?} should be rejected");
        }

        let error = by_extension(["tar.gz"]).unwrap_err();
        assert_eq!(error.to_string(), "Incorrectly formatted extension \"tar.gz\"");
    }

    #[tokio::test]
    async fn an_empty_list_matches_nothing() {
        let filter = by_extension(Vec::<&str>::new()).unwrap();
        assert!(!filter.filter(&info_with_ext(".png")).await.unwrap());
    }
}
