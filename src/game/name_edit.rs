//! Name editing before the game starts.
//!
//! Keyboard capture lives in the client; it only forwards raw key names.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEdit {
    Append(char),
    DeleteLast,
    Commit,
}

impl NameEdit {
    /// Map a browser key name. Multi-character keys other than
    /// `Backspace` and `Enter` (Shift, ArrowLeft, ...) are ignored.
    pub fn from_key(key: &str) -> Option<NameEdit> {
        match key {
            "Backspace" => Some(NameEdit::DeleteLast),
            "Enter" => Some(NameEdit::Commit),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(NameEdit::Append(c)),
                    _ => None,
                }
            }
        }
    }

    /// Apply to a name. Returns true when editing is finished.
    pub fn apply(self, name: &mut String) -> bool {
        match self {
            NameEdit::Append(c) => {
                name.push(c);
                false
            }
            NameEdit::DeleteLast => {
                name.pop();
                false
            }
            NameEdit::Commit => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_browser_keys() {
        assert_eq!(NameEdit::from_key("a"), Some(NameEdit::Append('a')));
        assert_eq!(NameEdit::from_key(" "), Some(NameEdit::Append(' ')));
        assert_eq!(NameEdit::from_key("é"), Some(NameEdit::Append('é')));
        assert_eq!(NameEdit::from_key("Backspace"), Some(NameEdit::DeleteLast));
        assert_eq!(NameEdit::from_key("Enter"), Some(NameEdit::Commit));
        assert_eq!(NameEdit::from_key("Shift"), None);
        assert_eq!(NameEdit::from_key(""), None);
    }

    #[test]
    fn edits_a_name() {
        let mut name = String::new();
        for key in ["A", "n", "x", "Backspace", "a"] {
            let edit = NameEdit::from_key(key).expect("mapped key");
            assert!(!edit.apply(&mut name));
        }
        assert_eq!(name, "Ana");
        assert!(NameEdit::Commit.apply(&mut name));
    }

    #[test]
    fn delete_on_empty_name_is_harmless() {
        let mut name = String::new();
        NameEdit::DeleteLast.apply(&mut name);
        assert_eq!(name, "");
    }
}
