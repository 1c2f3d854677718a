//! Comment-preserving INI documents for frontend configuration and theme files.
//!
//! An [`IniFile`] keeps every line it reads, so saving an edited file changes only the
//! values that were set: comments stay at their column, whitespace around `=` is kept and
//! unknown lines are written back untouched. [`IniFileWithDefault`] layers a user file over
//! a stock default file.
//!
//! ```
//! use ini_keeper::{IniFile, IniRead};
//!
//! let mut ini: IniFile = "[Theme]\nLogo = old.png ; comment\n".parse().unwrap();
//! ini.set_key_value(Some("Theme"), "Logo", "Tau.png");
//! ini.set_key_values(Some("Theme"), "rect", &[10, 20, 100, 200]);
//!
//! assert_eq!(ini.get_key_value(Some("Theme"), "Logo"), "Tau.png");
//! assert_eq!(ini.get_ints(Some("Theme"), "rect"), vec![10, 20, 100, 200]);
//! assert!(ini.to_string().contains("Logo = Tau.png ; comment"));
//! ```

pub mod document;
pub mod encoding;
pub mod error;
pub mod fallback;
pub mod handle;
pub mod line;
pub mod options;
pub mod read;
pub mod section;
pub mod util;

pub use document::{IniFile, KeyPair};
pub use encoding::TextEncoding;
pub use error::IniError;
pub use fallback::IniFileWithDefault;
pub use handle::{ScopedHandle, SharedHandle};
pub use line::{Comment, LineKind, ParsedLine};
pub use options::IniOptions;
pub use read::IniRead;
pub use section::IniSection;
