use unicode_bidi::{BidiClass, bidi_class};

/// Base direction of a piece of text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Direction of the first strong character, LTR when there is none.
    /// Same rule a browser applies for `dir="auto"`.
    pub fn detect(text: &str) -> Self {
        text.chars()
            .find_map(|c| match bidi_class(c) {
                BidiClass::L => Some(Self::Ltr),
                BidiClass::R | BidiClass::AL => Some(Self::Rtl),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(TextDirection::detect("Chat A"), TextDirection::Ltr);
        assert_eq!(TextDirection::detect("שיחה"), TextDirection::Rtl);
        assert_eq!(TextDirection::detect("مرحبا"), TextDirection::Rtl);
        assert_eq!(TextDirection::detect("Conversa técnica"), TextDirection::Ltr);
    }

    #[test]
    fn test_leading_neutrals_are_skipped() {
        assert_eq!(TextDirection::detect("123 - مرحبا"), TextDirection::Rtl);
        assert_eq!(TextDirection::detect("  (abc) שלום"), TextDirection::Ltr);
    }

    #[test]
    fn test_no_strong_character_is_ltr() {
        assert_eq!(TextDirection::detect(""), TextDirection::Ltr);
        assert_eq!(TextDirection::detect("42 ?!"), TextDirection::Ltr);
    }
}
