//! Content encodings accepted by the appliance.

use std::fmt;
use std::io::{self, Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderWriter;
use flate2::Compression;
use flate2::write::ZlibEncoder;

/// How record content is framed inside `<content>`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentEncoding {
    /// Plain base64.
    #[default]
    Base64Binary,
    /// zlib-compressed, then base64.
    Base64Compressed,
}

impl ContentEncoding {
    /// Returns the value of the `encoding` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64Binary => "base64binary",
            Self::Base64Compressed => "base64compressed",
        }
    }

    /// Picks an encoding from the comma-separated list an appliance reports.
    ///
    /// Compression is used only when requested and advertised.
    #[must_use]
    pub fn negotiate(supported: &str, compress: bool) -> Self {
        let advertised = supported
            .split(',')
            .map(str::trim)
            .any(|name| name.eq_ignore_ascii_case(Self::Base64Compressed.as_str()));
        if compress && advertised {
            Self::Base64Compressed
        } else {
            Self::Base64Binary
        }
    }

    /// Streams `content` into `out` in this encoding and returns the number
    /// of source bytes consumed.
    pub fn encode<W: Write>(self, content: &mut dyn Read, out: W) -> io::Result<u64> {
        let mut base64 = EncoderWriter::new(out, &STANDARD);
        let copied = match self {
            Self::Base64Binary => io::copy(content, &mut base64)?,
            Self::Base64Compressed => {
                let mut zlib = ZlibEncoder::new(&mut base64, Compression::default());
                let copied = io::copy(content, &mut zlib)?;
                zlib.finish()?;
                copied
            }
        };
        base64.finish()?;
        Ok(copied)
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
