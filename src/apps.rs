//! Bundle-identifier → display-name lookup.
//!
//! ANCS reports the sending app as an iOS bundle identifier
//! (`com.apple.MobileSMS`). The lookup normalizes the incoming value
//! (trim, ASCII case-insensitive, one pair of surrounding quotes
//! stripped) and matches it exactly or as a suffix, since some payloads
//! carry a prefix in front of the bundle id.

/// Shown when the phone sends no app identifier at all.
pub const UNKNOWN_APP: &str = "(unknown)";

/// Resolves an app identifier to something worth putting on screen.
pub trait AppNames {
    fn resolve<'a>(&'a self, bundle_id: &'a str) -> &'a str;
}

/// Lookup over a static `(bundle id, display name)` table.
pub struct AppTable<'t> {
    entries: &'t [(&'t str, &'t str)],
}

impl<'t> AppTable<'t> {
    pub const fn new(entries: &'t [(&'t str, &'t str)]) -> Self {
        Self { entries }
    }
}

impl AppNames for AppTable<'_> {
    /// Empty input gives [`UNKNOWN_APP`]; an unknown identifier is
    /// returned as-is.
    fn resolve<'a>(&'a self, bundle_id: &'a str) -> &'a str {
        let incoming = normalize(bundle_id);
        if incoming.is_empty() {
            return UNKNOWN_APP;
        }

        self.entries
            .iter()
            .find(|(known, _)| matches(incoming, normalize(known)))
            .map(|(_, name)| *name)
            .unwrap_or(bundle_id)
    }
}

fn normalize(value: &str) -> &str {
    let value = value.trim();
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.trim(),
        None => value,
    }
}

fn matches(incoming: &str, known: &str) -> bool {
    let (incoming, known) = (incoming.as_bytes(), known.as_bytes());
    incoming.len() >= known.len()
        && incoming[incoming.len() - known.len()..].eq_ignore_ascii_case(known)
}

/// Apps that most commonly notify.
pub const COMMON_APPS: &[(&str, &str)] = &[
    ("com.apple.MobileSMS", "Messages"),
    ("com.apple.mobilemail", "Mail"),
    ("com.apple.mobilephone", "Phone"),
    ("com.apple.mobilecal", "Calendar"),
    ("com.apple.reminders", "Reminders"),
    ("com.apple.facetime", "FaceTime"),
    ("com.apple.mobiletimer", "Clock"),
    ("com.apple.findmy", "Find My"),
    ("com.apple.Health", "Health"),
    ("net.whatsapp.WhatsApp", "WhatsApp"),
    ("ph.telegra.Telegraph", "Telegram"),
    ("org.whispersystems.signal", "Signal"),
    ("com.tinyspeck.chatlyio", "Slack"),
    ("com.google.Gmail", "Gmail"),
    ("com.microsoft.Office.Outlook", "Outlook"),
];

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: AppTable<'static> = AppTable::new(COMMON_APPS);

    #[test]
    fn exact_match() {
        assert_eq!(TABLE.resolve("com.apple.MobileSMS"), "Messages");
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(TABLE.resolve("  COM.APPLE.MOBILEMAIL \n"), "Mail");
    }

    #[test]
    fn quoted_identifier() {
        assert_eq!(TABLE.resolve("\" com.google.Gmail \""), "Gmail");
    }

    #[test]
    fn suffix_match() {
        assert_eq!(TABLE.resolve("x-ancs:net.whatsapp.WhatsApp"), "WhatsApp");
    }

    #[test]
    fn unknown_identifier_passes_through() {
        assert_eq!(TABLE.resolve("com.example.Thing"), "com.example.Thing");
    }

    #[test]
    fn empty_identifier_is_unknown() {
        assert_eq!(TABLE.resolve(""), UNKNOWN_APP);
        assert_eq!(TABLE.resolve("   "), UNKNOWN_APP);
        assert_eq!(TABLE.resolve("\"\""), UNKNOWN_APP);
    }

    #[test]
    fn shorter_input_does_not_match_longer_entry() {
        assert_eq!(TABLE.resolve("Mail"), "Mail");
    }
}
