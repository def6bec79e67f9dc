//! Progress arithmetic and the fixed status messages of a translation job.

/// First event of every job, emitted when it leaves `Pending`.
pub const MSG_STARTING: &str = "Starting translation...";

/// Emitted once the workbook has been loaded and scanned.
pub const MSG_ANALYZING: &str = "Analyzing file contents...";

/// Emitted before the translated workbook is written.
pub const MSG_SAVING: &str = "Saving translated file...";

/// Message of the terminal success event.
pub const MSG_COMPLETED: &str = "Translation completed!";

/// Message of the terminal success event when nothing needed translating.
pub const MSG_NOTHING_TO_TRANSLATE: &str = "No text to translate!";

/// Percentage reported while the output file is being saved.
pub const SAVING_PERCENT: u8 = 95;

/// Percentage of a finished job.
pub const COMPLETE_PERCENT: u8 = 100;

/// `floor(100 * processed / total)`, saturating at 100.
///
/// A job with no units of work reports 0 until it completes.
pub fn percent_of(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let processed = processed.min(total) as u64;
    (processed * 100 / total as u64) as u8
}

/// Human-readable progress line for the cell about to be translated.
///
/// `index` is zero-based; the message counts from one.
pub fn cell_message(index: usize, total: usize, sheet: &str) -> String {
    format!(
        "Translating cell {} of {} ({}%) in sheet '{}'",
        index + 1,
        total,
        percent_of(index, total),
        sheet
    )
}
