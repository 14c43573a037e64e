//! Registry hash strings and file digests.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Length of a hex digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }

    /// Lowercase hex digest of a file.
    pub fn hash_file(&self, path: &Path) -> io::Result<String> {
        self.hash_reader(File::open(path)?)
    }

    /// Lowercase hex digest of everything `reader` yields.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        match self {
            Self::Md5 => {
                let mut hasher = Md5::new();
                io::copy(&mut reader, &mut hasher)?;
                Ok(format!("{:x}", hasher.finalize()))
            }
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                io::copy(&mut reader, &mut hasher)?;
                Ok(format!("{:x}", hasher.finalize()))
            }
        }
    }
}

/// An expected file hash, written `md5:<hex>`, `sha256:<hex>` or bare
/// `<hex>` (sha256).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    pub algorithm: HashAlgorithm,
    pub hex: String,
}

impl FileHash {
    /// Hash `path` with this hash's algorithm and compare.
    ///
    /// Returns the actual hash string on mismatch.
    pub fn verify(&self, path: &Path) -> io::Result<Result<(), String>> {
        let actual = self.algorithm.hash_file(path)?;
        if actual == self.hex {
            Ok(Ok(()))
        } else {
            Ok(Err(format!("{}:{}", self.algorithm.name(), actual)))
        }
    }
}

impl FromStr for FileHash {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, hex) = match s.split_once(':') {
            Some(("md5", hex)) => (HashAlgorithm::Md5, hex),
            Some(("sha256", hex)) => (HashAlgorithm::Sha256, hex),
            Some(_) => return Err(FetchError::InvalidHash(s.to_string())),
            None => (HashAlgorithm::Sha256, s),
        };
        if hex.len() != algorithm.hex_len() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FetchError::InvalidHash(s.to_string()));
        }
        Ok(Self {
            algorithm,
            hex: hex.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for FileHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.name(), self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_parse_prefixed_and_bare() {
        let md5: FileHash = "md5:64caf070f295534d312fea75b0bcb888".parse().unwrap();
        assert_eq!(md5.algorithm, HashAlgorithm::Md5);
        assert_eq!(md5.hex, "64caf070f295534d312fea75b0bcb888");

        let sha: FileHash = format!("sha256:{}", ABC_SHA256).parse().unwrap();
        assert_eq!(sha.algorithm, HashAlgorithm::Sha256);

        let bare: FileHash = ABC_SHA256.parse().unwrap();
        assert_eq!(bare, sha);
        assert_eq!(bare.to_string(), format!("sha256:{}", ABC_SHA256));
    }

    #[test]
    fn test_parse_normalizes_case() {
        let hash: FileHash = "md5:900150983CD24FB0D6963F7D28E17F72".parse().unwrap();
        assert_eq!(hash.hex, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["sha1:abc", "md5:xyz", "md5:1234", "", "md5:", "not-a-hash"] {
            assert!(
                matches!(bad.parse::<FileHash>(), Err(FetchError::InvalidHash(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_digest_known_values() {
        assert_eq!(
            HashAlgorithm::Md5.hash_reader(&b"abc"[..]).unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(HashAlgorithm::Sha256.hash_reader(&b"abc"[..]).unwrap(), ABC_SHA256);
        assert_eq!(
            HashAlgorithm::Md5.hash_reader(&b""[..]).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_digest_spans_copy_buffer() {
        // Larger than io::copy's internal buffer
        let data = vec![b'a'; 100_000];
        let hex = HashAlgorithm::Sha256.hash_reader(&data[..]).unwrap();
        assert_eq!(hex.len(), HashAlgorithm::Sha256.hex_len());
        assert_eq!(hex, HashAlgorithm::Sha256.hash_reader(&data[..]).unwrap());
        assert_ne!(hex, HashAlgorithm::Sha256.hash_reader(&data[..99_999]).unwrap());
    }
}
