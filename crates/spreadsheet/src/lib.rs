//! Text layer of OOXML workbooks (`.xlsx` / `.xlsm`).
//!
//! [`Workbook`] lists the string cells worth translating and writes a copy
//! of the archive with replacement text. Only the parts holding replaced
//! text are regenerated: the shared-string table, plus any worksheet whose
//! inline strings changed, where nothing but the `<is>` elements is
//! touched. Every other archive entry (styles, drawings, macros) is copied
//! byte for byte, so formatting and layout survive by construction.

mod xml;

pub mod workbook;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use workbook::{TranslatableCell, Workbook, WorkbookError};
