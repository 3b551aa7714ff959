use crate::Result;
use crate::thread::ThreadView;

/// Convert a thread view to JSON
pub fn convert_to_json(view: &ThreadView, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(view)?) } else { Ok(serde_json::to_string(view)?) }
}
