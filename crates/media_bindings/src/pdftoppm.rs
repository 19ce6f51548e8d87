use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{command, BindingError};

/// Page rasterization through poppler's `pdftoppm`
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    bin: PathBuf,
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Pdftoppm {
    const PAGE_PREFIX: &str = "page";

    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Renders every page of `pdf` to a PNG inside `out_dir`.
    ///
    /// Returns the page images in page order. `pdftoppm` zero-pads the page
    /// number to the width of the page count, so a lexical sort is enough.
    #[tracing::instrument(skip(self))]
    pub async fn rasterize(
        &self,
        pdf: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, BindingError> {
        tokio::fs::create_dir_all(out_dir).await?;
        command::run(&self.bin, &rasterize_args(pdf, dpi, out_dir)).await?;

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_page_image(&path) {
                pages.push(path);
            }
        }
        pages.sort();

        if pages.is_empty() {
            return Err(BindingError::MissingOutput {
                program: self.bin.display().to_string(),
                path: out_dir.join(format!("{}-*.png", Self::PAGE_PREFIX)),
            });
        }

        Ok(pages)
    }
}

fn rasterize_args(pdf: &Path, dpi: u32, out_dir: &Path) -> Vec<OsString> {
    vec![
        "-r".into(),
        dpi.to_string().into(),
        "-png".into(),
        pdf.into(),
        out_dir.join(Pdftoppm::PAGE_PREFIX).into(),
    ]
}

fn is_page_image(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(Pdftoppm::PAGE_PREFIX) && name.ends_with(".png")
}
