use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::annotate::{AddonInfo, AddonRegistry};
use crate::scanner::patterns::{
    GAME_INSTANCE_MARKER, MAX_LINE_LEN, TRACEBACK_MARKER, WORKSHOP_TOKEN_RE,
};

static TIME_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+):(\d+):(\d+)\]:\s").unwrap());

/// Build banner, e.g. `Don't Starve Together: 654321 WIN32_STEAM`.
static BUILD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Don't Starve( Together)?: (\d+) ([A-Z0-9_]+)").unwrap());

/// Arch banner, e.g. `Mode: 64-bit`.
static ARCH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Mode: ([\w-]+)").unwrap());

/// e.g. `Mounting file system databundles/klump.zip successful.`
static BUNDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Mounting file system databundles/([\w_]+\.zip) (successful|skipped)\.$").unwrap()
});

/// Script debug-print prefix, e.g. `scripts/widgets/craftslot.lua(99,1) `.
static SCRIPT_PRINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^scripts/[\w/]+\.lua\(\d+,\d+\)\s").unwrap());

/// e.g. `Loading mod: workshop-351325790 (Geometric Placement) Version:3.2.0`.
static LOADING_MOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Fontend-|Frontend-)?Loading mod:\s").unwrap());

const MODDIR_PREFIX: &str = "ModIndex:GetModsToLoad inserting moddir, \t";
const VERSION_SUFFIX: &str = " Version:";

/// Whole-log metadata extracted in a single pass: build identity, databundle
/// mounts, loaded add-ons, total runtime and crash flags.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogSummary {
    pub build_version: String,
    pub build_platform: String,
    pub build_arch: String,
    /// Bundle file -> mounted from zip (`false` means loose files).
    pub databundles: BTreeMap<String, bool>,
    /// Add-ons actually loaded, keyed by directory token.
    pub addons: BTreeMap<String, AddonInfo>,
    /// Last timestamp prefix seen, `[h, m, s]`.
    pub total_time: [u32; 3],
    pub has_lua_crash: bool,
    pub has_stacktrace: bool,

    #[serde(skip)]
    registered_dirs: HashSet<String>,
}

impl LogSummary {
    /// Scan the whole document. Oversized lines are skipped, the same
    /// ceiling the classifier applies.
    pub fn scan(lines: &[&str]) -> Self {
        let mut summary = Self::default();
        for line in lines {
            summary.take_line(line);
        }
        summary
    }

    /// Registry of the add-ons this log reports as loaded.
    pub fn addon_registry(&self) -> AddonRegistry {
        self.addons.values().cloned().collect()
    }

    fn take_line(&mut self, line: &str) {
        if line.len() >= MAX_LINE_LEN {
            return;
        }
        let mut rest = line.trim_end_matches(['\r', '\n', '\t']);

        if let Some(m) = TIME_PREFIX_RE.captures(rest) {
            self.total_time = [
                m[1].parse().unwrap_or(0),
                m[2].parse().unwrap_or(0),
                m[3].parse().unwrap_or(0),
            ];
            rest = &rest[m.get(0).map(|g| g.end()).unwrap_or(0)..];
        }

        if self.build_version.is_empty() && rest.starts_with("Don't Starve") {
            if let Some(m) = BUILD_RE.captures(rest) {
                self.build_version = m[2].to_string();
                self.build_platform = m[3].to_string();
                return;
            }
        }

        if self.build_arch.is_empty() {
            if let Some(m) = ARCH_RE.captures(rest) {
                self.build_arch = m[1].to_string();
                return;
            }
        }

        if let Some(m) = BUNDLE_RE.captures(rest) {
            let mounted_zip = &m[2] == "successful";
            self.databundles.insert(m[1].to_string(), mounted_zip);
            return;
        }

        if rest == GAME_INSTANCE_MARKER {
            // Launch banner is over; whatever was not seen stays unknown.
            self.fill_unknown_build_fields();
            return;
        }

        // Strip the script debug-print prefix so mod lines printed through
        // it still match below.
        if let Some(m) = SCRIPT_PRINT_RE.find(rest) {
            rest = &rest[m.end()..];
        }

        if let Some(n) = rest.find(MODDIR_PREFIX) {
            let dir = &rest[n + MODDIR_PREFIX.len()..];
            self.registered_dirs.insert(dir.to_string());
            return;
        }

        if let Some(m) = LOADING_MOD_RE.find(rest) {
            if self.take_loading_mod(&rest[m.end()..]) {
                return;
            }
        }

        if rest == "stack traceback:" {
            self.has_stacktrace = true;
        }

        if rest.contains(TRACEBACK_MARKER) {
            self.has_lua_crash = true;
        }
    }

    /// Parse one `Loading mod:` entry: `<dir> (<name>)[ Version:<v>]`.
    /// First sighting of a directory wins.
    fn take_loading_mod(&mut self, entry: &str) -> bool {
        let (entry, version) = match entry.rfind(VERSION_SUFFIX) {
            Some(n) => (
                entry[..n].trim_end(),
                Some(entry[n + VERSION_SUFFIX.len()..].trim().to_string()),
            ),
            None => (entry.trim_end(), None),
        };

        if let Some(m) = WORKSHOP_TOKEN_RE.captures(entry) {
            let token = m.get(0).map(|g| g.as_str()).unwrap_or_default();
            let id = m.get(1).map(|g| g.as_str()).unwrap_or_default();
            let span_end = m.get(0).map(|g| g.end()).unwrap_or(0);
            let name = entry
                .get(span_end..)
                .and_then(|r| r.strip_prefix(" ("))
                .and_then(|r| r.strip_suffix(')'))
                .unwrap_or(token);
            self.addons
                .entry(token.to_string())
                .or_insert_with(|| AddonInfo {
                    dir: token.to_string(),
                    display_name: name.to_string(),
                    version,
                    workshop_id: Some(id.to_string()),
                });
            return true;
        }

        // Local add-ons carry no workshop token; match against the dirs the
        // mod index registered earlier in the log.
        let matched = self.registered_dirs.iter().find_map(|dir| {
            entry
                .strip_prefix(dir.as_str())
                .and_then(|r| r.strip_prefix(" ("))
                .and_then(|r| r.strip_suffix(')'))
                .map(|name| (dir.clone(), name.to_string()))
        });
        if let Some((dir, name)) = matched {
            self.addons.entry(dir.clone()).or_insert_with(|| AddonInfo {
                dir,
                display_name: name,
                version,
                workshop_id: None,
            });
            return true;
        }
        false
    }

    fn fill_unknown_build_fields(&mut self) {
        for field in [
            &mut self.build_version,
            &mut self.build_platform,
            &mut self.build_arch,
        ] {
            if field.is_empty() {
                field.push_str("unknown");
            }
        }
    }
}
