//! Image and text input for qrstamp: QR decoding, QR generation, stdin
//! payloads, and the batch analysis driver.
//!
//! # Modules
//!
//! - [`decode`]: image loading and QR decoding (`rqrr`)
//! - [`encode`]: QR generation to PNG (`qrcode` + `image`)
//! - [`stdin`]: payload text from stdin
//! - [`batch`]: concurrent per-image analysis into [`qrstamp_business::Record`]s
//!
//! Decoding, encoding and stdin access sit behind traits so callers can
//! substitute fakes in tests.

pub mod batch;
pub mod decode;
pub mod encode;
pub mod stdin;

pub use batch::{NO_QR_FOUND, analyze_path, analyze_paths, source_name};
pub use decode::{DecodeError, QrDecoder, RqrrDecoder, decode_file, load_image};
pub use encode::{EncodeError, EncodeOptions, MAX_IMAGE_SIDE, PngQrEncoder, QrEncoder, render_qr_image};
pub use stdin::{MockStdinReader, PayloadReader, RealStdinReader};
