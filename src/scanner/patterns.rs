use once_cell::sync::Lazy;
use regex::Regex;

/// Marker opening an error block.
pub const TRACEBACK_MARKER: &str = "LUA ERROR stack traceback:";

/// Marker printed once per game-instance start.
pub const GAME_INSTANCE_MARKER: &str = "cGame::StartPlaying";

/// Lines at or beyond this byte length are never pattern-matched.
pub const MAX_LINE_LEN: usize = 2000;

/// Timestamp prefix `[h:m:s]:` that closes an open traceback block.
pub static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+):(\d+):(\d+)\]:").unwrap());

/// Engine script frame, e.g. `scripts/mainfunctions.lua:123 in (...` or
/// the debug-print shape `scripts/widgets/craftslot.lua(99,1)`.
pub static ENGINE_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^scripts/[^:.]+\.lua(:\d+ in \(|\(\d+,1\))").unwrap());

/// Foreign-function frame, e.g. `=[C] in function 'pcall'`.
pub static FOREIGN_FN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^=\[C\] in function ").unwrap());

/// Tail-call frame, e.g. `=(tail call) ?`.
pub static TAIL_CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^=\(tail call\)?").unwrap());

/// Add-on script frame; the capture is the add-on directory token.
pub static ADDON_SRC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\./mods/([^/]+)/").unwrap());

/// Inline workshop reference token; the capture is the numeric id.
pub static WORKSHOP_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"workshop-(\d+)\b").unwrap());

/// Shape of a resolvable workshop id. Anything else is inert text.
pub static WORKSHOP_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5,15}$").unwrap());
