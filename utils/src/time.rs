//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format a span of ledger positions, with its wall-clock estimate when the
/// block interval is known.
pub fn format_blocks(blocks: u64, secs_per_block: Option<u64>) -> String {
    let unit = if blocks == 1 { "block" } else { "blocks" };
    match secs_per_block {
        Some(interval) if interval > 0 => format!(
            "{} {} (~{})",
            blocks,
            unit,
            format_duration(blocks.saturating_mul(interval))
        ),
        _ => format!("{} {}", blocks, unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_range() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(7260), "2h 1m");
        assert_eq!(format_duration(90000), "1d 1h");
    }

    #[test]
    fn formats_blocks_with_and_without_interval() {
        assert_eq!(format_blocks(1, None), "1 block");
        assert_eq!(format_blocks(5, Some(0)), "5 blocks");
        assert_eq!(format_blocks(10, Some(12)), "10 blocks (~2m 0s)");
    }
}
