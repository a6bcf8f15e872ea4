use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~`, alone or followed by a separator, to the user's home
/// directory. Surrounding whitespace is dropped; `~name` paths are left as they are.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let Some(after_tilde) = trimmed.strip_prefix('~') else {
        return PathBuf::from(trimmed);
    };
    let rest = match after_tilde.chars().next() {
        None => "",
        Some('/' | '\\') => &after_tilde[1..],
        Some(_) => return PathBuf::from(trimmed),
    };
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if rest.is_empty() { home } else { home.join(rest) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_untouched() {
        assert_eq!(expand_tilde(" /etc/seq.json "), PathBuf::from("/etc/seq.json"));
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/seq.json"), home.join("seq.json"));
            assert_eq!(expand_tilde("~"), home);
        }
    }

    #[test]
    fn named_home_is_not_expanded() {
        assert_eq!(expand_tilde("~robot/seq.json"), PathBuf::from("~robot/seq.json"));
    }
}
