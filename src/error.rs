pub type DotmapResult<T> = Result<T, DotmapError>;

#[derive(thiserror::Error, Debug)]
pub enum DotmapError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("locale error: {0}")]
    Locale(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DotmapError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn locale(msg: impl Into<String>) -> Self {
        Self::Locale(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            DotmapError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(DotmapError::render("x").to_string().contains("render error:"));
        assert!(DotmapError::locale("x").to_string().contains("locale error:"));
        assert!(
            DotmapError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = DotmapError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
