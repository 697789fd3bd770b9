use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use uuid::Uuid;

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

/// Identifier source for transcript messages. Injected so tests can run with
/// a deterministic sequence instead of ambient randomness.
pub trait IdGen {
    fn next_id(&mut self) -> Uuid;
}

/// Default generator backed by random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGen for RandomIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Hour:minute wall-clock stamp in the local offset, for display only.
pub fn format_message_timestamp() -> String {
    let mut now = OffsetDateTime::now_utc();
    if let Ok(offset) = UtcOffset::current_local_offset() {
        now = now.to_offset(offset);
    }
    now.format(MESSAGE_TIME_FORMAT).unwrap_or_default()
}

/// Human-readable file size with binary (1024-based) unit scaling, rounded
/// to two decimal places with trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent as usize])
}
