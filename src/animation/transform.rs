use std::fmt;

/// Transform function wrapping an animated value, e.g. `translateY(15px)`.
///
/// Only single-argument functions are animatable; everything else in the
/// transform grammar is rejected by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformFunction {
    /// Uniform scale (`scale(1.5)`)
    Scale,
    /// Horizontal translation
    TranslateX,
    /// Vertical translation
    TranslateY,
    /// Depth translation
    TranslateZ,
}

impl TransformFunction {
    /// The function name as written in a style attribute
    pub fn name(&self) -> &'static str {
        match self {
            TransformFunction::Scale => "scale",
            TransformFunction::TranslateX => "translateX",
            TransformFunction::TranslateY => "translateY",
            TransformFunction::TranslateZ => "translateZ",
        }
    }

    /// Look up the translation family (`translateX`, `translateY`, `translateZ`)
    pub fn translation(name: &str) -> Option<Self> {
        match name {
            "translateX" => Some(TransformFunction::TranslateX),
            "translateY" => Some(TransformFunction::TranslateY),
            "translateZ" => Some(TransformFunction::TranslateZ),
            _ => None,
        }
    }

    /// Look up any supported function by its exact name
    pub fn from_name(name: &str) -> Option<Self> {
        if name == TransformFunction::Scale.name() {
            Some(TransformFunction::Scale)
        } else {
            Self::translation(name)
        }
    }
}

impl fmt::Display for TransformFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for function in [
            TransformFunction::Scale,
            TransformFunction::TranslateX,
            TransformFunction::TranslateY,
            TransformFunction::TranslateZ,
        ] {
            assert_eq!(TransformFunction::from_name(function.name()), Some(function));
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(TransformFunction::from_name("rotate"), None);
        assert_eq!(TransformFunction::from_name("translate"), None);
        assert_eq!(TransformFunction::from_name("translatey"), None);
        assert_eq!(TransformFunction::translation("scale"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TransformFunction::TranslateX.to_string(), "translateX");
        assert_eq!(TransformFunction::Scale.to_string(), "scale");
    }
}
