use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use log::warn;

/// Byte order mark as it appears once decoded
pub const BOM: char = '\u{FEFF}';

/// How a file's text was stored on disk, so saving writes it back the same way.
///
/// Files are read as UTF-8 unless they start with a byte order mark naming another
/// Unicode encoding. Anything that is not valid UTF-8 is read as windows-1252, which maps
/// every byte to a character and back, so legacy Latin-1 files survive a load and save
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            bom: false,
        }
    }
}

impl TextEncoding {
    pub fn decode(bytes: &[u8]) -> (String, Self) {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            if had_errors {
                warn!("invalid {} sequences replaced while decoding", encoding.name());
            }
            return (text.into_owned(), Self { encoding, bom: true });
        }

        match std::str::from_utf8(bytes) {
            Ok(text) => (text.to_owned(), Self::default()),
            Err(_) => {
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
                let encoding = Self {
                    encoding: WINDOWS_1252,
                    bom: false,
                };
                (text.into_owned(), encoding)
            }
        }
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() + 3);
        if self.bom {
            bytes.extend_from_slice(self.bom_bytes());
        }

        if self.encoding == UTF_16LE {
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
        } else if self.encoding == UTF_16BE {
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
        } else {
            let (encoded, _, unmappable) = self.encoding.encode(text);
            if unmappable {
                warn!(
                    "characters outside {} were written as numeric character references",
                    self.encoding.name()
                );
            }
            bytes.extend_from_slice(&encoded);
        }
        bytes
    }

    fn bom_bytes(&self) -> &'static [u8] {
        if self.encoding == UTF_16LE {
            &[0xFF, 0xFE]
        } else if self.encoding == UTF_16BE {
            &[0xFE, 0xFF]
        } else {
            &[0xEF, 0xBB, 0xBF]
        }
    }

    /// Same encoding, written with a byte order mark
    pub fn with_bom(self) -> Self {
        Self { bom: true, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }
}
