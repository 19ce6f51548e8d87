//! # Media Bindings
//!
//! Thin async wrappers around the command line tools the digest pipelines
//! delegate to: `yt-dlp` for remote audio, `ffmpeg` for demuxing and
//! re-encoding, `tesseract` for OCR and `pdftoppm` for rasterizing PDF pages.
//!
//! Every wrapper only knows how to build an argument list and check that the
//! tool produced what it promised; interpreting the results is left to the
//! caller.

mod command;
mod error;
mod ffmpeg;
mod pdftoppm;
mod tesseract;
mod ytdlp;

pub use error::BindingError;
pub use ffmpeg::Ffmpeg;
pub use pdftoppm::Pdftoppm;
pub use tesseract::Tesseract;
pub use ytdlp::{random_user_agent, YtDlp};
