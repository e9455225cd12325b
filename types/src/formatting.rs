//! Small text helpers shared by the engine and its consumers.
//!
//! Counted labels (`"Made Gene Tonic: Beast (3)"`) are both produced and
//! re-read by the timeline, so parsing and formatting live side by side here.

/// Format a description with a repetition count.
///
/// A count of one (or zero) leaves the description untouched.
///
/// # Examples
/// ```
/// use alv_types::formatting::format_count_label;
/// assert_eq!(format_count_label("Hybridized: Fish", 1), "Hybridized: Fish");
/// assert_eq!(format_count_label("Hybridized: Fish", 2), "Hybridized: Fish (2)");
/// ```
pub fn format_count_label(description: &str, count: u32) -> String {
    if count > 1 {
        format!("{} ({})", description, count)
    } else {
        description.to_string()
    }
}

/// Split a counted label back into its description and count.
///
/// Returns `None` if the label carries no well-formed `(N)` suffix.
///
/// # Examples
/// ```
/// use alv_types::formatting::parse_count_label;
/// assert_eq!(parse_count_label("Made Gene Tonic: Beast (3)"), Some(("Made Gene Tonic: Beast", 3)));
/// assert_eq!(parse_count_label("Made Gene Tonic: Beast"), None);
/// assert_eq!(parse_count_label("odd (label)"), None);
/// ```
pub fn parse_count_label(label: &str) -> Option<(&str, u32)> {
    let inner = label.strip_suffix(')')?;
    let open = inner.rfind(" (")?;
    let count = inner[open + 2..].parse::<u32>().ok()?;
    Some((&inner[..open], count))
}

/// Format an inclusive turn range the way interval headers show it.
///
/// # Examples
/// ```
/// use alv_types::formatting::format_turn_range;
/// assert_eq!(format_turn_range(12, 15), "[12-15]");
/// assert_eq!(format_turn_range(7, 7), "[7]");
/// ```
pub fn format_turn_range(start: u32, end: u32) -> String {
    if start == end {
        format!("[{}]", start)
    } else {
        format!("[{}-{}]", start, end)
    }
}
